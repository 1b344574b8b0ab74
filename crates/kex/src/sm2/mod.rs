//! SM2 key exchange protocol
//!
//! Both sides compute `t = (d + x̄ · r) mod n` from their own keys, where
//! x̄ folds the ephemeral x-coordinate down to 127 bits with the top bit
//! forced, then meet at the joint point
//! `U = [t](P_peer + [x̄_peer]R_peer)`. The session key is
//! `KDF(xU || yU || Z_initiator || Z_responder)` and the confirmation tags
//! hash yU together with a transcript digest of both identities and both
//! ephemeral points.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::vec::Vec;

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use gmcrypt_algorithms::ec::sm2::{
    compute_z, generate_keypair, scalar_mult_base_g, validate_public_key, Point, Scalar,
};
use gmcrypt_algorithms::hash::{HashFunction, Sm3};
use gmcrypt_algorithms::kdf::{KeyDerivationFunction, X963Kdf};
use gmcrypt_internal::constant_time::ct_eq;
use gmcrypt_params::sm2::{
    SM2_FIELD_ELEMENT_SIZE, SM2_POINT_UNCOMPRESSED_SIZE, SM2_SCALAR_SIZE,
};

use crate::error::{Error, Result};

#[cfg(test)]
mod tests;

const TAG_SIZE: usize = 32;

/// Which side of the exchange this party plays
///
/// The roles are not symmetric: the initiator's Z digest and ephemeral
/// point come first in the key derivation, and the confirmation tag
/// prefixes differ per direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

/// The public bundle a party sends to its peer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sm2ExchangePublic {
    static_point: [u8; SM2_POINT_UNCOMPRESSED_SIZE],
    ephemeral_point: [u8; SM2_POINT_UNCOMPRESSED_SIZE],
    id: Vec<u8>,
}

impl Sm2ExchangePublic {
    pub fn static_point(&self) -> &[u8; SM2_POINT_UNCOMPRESSED_SIZE] {
        &self.static_point
    }

    pub fn ephemeral_point(&self) -> &[u8; SM2_POINT_UNCOMPRESSED_SIZE] {
        &self.ephemeral_point
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    /// Wire encoding: static point, ephemeral point, then ENTL (the
    /// identity length in bits as a 16-bit big-endian integer) and the
    /// identity itself
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 * SM2_POINT_UNCOMPRESSED_SIZE + 2 + self.id.len());
        out.extend_from_slice(&self.static_point);
        out.extend_from_slice(&self.ephemeral_point);
        out.extend_from_slice(&((self.id.len() * 8) as u16).to_be_bytes());
        out.extend_from_slice(&self.id);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        const POINTS: usize = 2 * SM2_POINT_UNCOMPRESSED_SIZE;
        if bytes.len() < POINTS + 2 {
            return Err(Error::InvalidPeerKey("Truncated exchange message"));
        }
        let entl = u16::from_be_bytes([bytes[POINTS], bytes[POINTS + 1]]) as usize;
        if entl % 8 != 0 {
            return Err(Error::InvalidPeerKey(
                "Identity bit length is not a whole number of bytes",
            ));
        }
        if bytes.len() != POINTS + 2 + entl / 8 {
            return Err(Error::InvalidPeerKey("Exchange message length mismatch"));
        }

        let mut static_point = [0u8; SM2_POINT_UNCOMPRESSED_SIZE];
        let mut ephemeral_point = [0u8; SM2_POINT_UNCOMPRESSED_SIZE];
        static_point.copy_from_slice(&bytes[..SM2_POINT_UNCOMPRESSED_SIZE]);
        ephemeral_point.copy_from_slice(&bytes[SM2_POINT_UNCOMPRESSED_SIZE..POINTS]);
        let id = bytes[POINTS + 2..].to_vec();

        Ok(Sm2ExchangePublic {
            static_point,
            ephemeral_point,
            id,
        })
    }
}

/// A derived session key awaiting key confirmation
///
/// The key itself stays sealed until the peer's confirmation tag has been
/// checked; [`Sm2SharedSecret::confirm`] is the only way to obtain it.
pub struct Sm2SharedSecret {
    key: Zeroizing<Vec<u8>>,
    outbound: [u8; TAG_SIZE],
    inbound: [u8; TAG_SIZE],
}

impl Sm2SharedSecret {
    /// The confirmation tag to send to the peer
    pub fn outbound_tag(&self) -> &[u8; TAG_SIZE] {
        &self.outbound
    }

    /// Checks the confirmation tag received from the peer
    pub fn verify_inbound(&self, tag: &[u8]) -> bool {
        ct_eq(&self.inbound[..], tag)
    }

    /// Releases the session key after verifying the peer's confirmation tag
    ///
    /// On mismatch the key is dropped and zeroized without ever being
    /// exposed.
    pub fn confirm(self, peer_tag: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if !ct_eq(&self.inbound[..], peer_tag) {
            return Err(Error::Authentication("Confirmation tag mismatch"));
        }
        Ok(self.key)
    }
}

/// One side of an SM2 key exchange
pub struct Sm2ExchangeParty {
    role: Role,
    static_d: Scalar,
    ephemeral_d: Scalar,
    static_q: Point,
    ephemeral_q: Point,
    id: Vec<u8>,
}

/// Folds an x-coordinate to `2^127 + (x mod 2^127)`
fn reduce_x(x: &[u8; SM2_FIELD_ELEMENT_SIZE]) -> Scalar {
    let mut bytes = [0u8; SM2_SCALAR_SIZE];
    bytes[16..].copy_from_slice(&x[16..]);
    bytes[16] = (bytes[16] & 0x7F) | 0x80;
    // the folded value is below 2^128 and therefore already below n
    Scalar::from_bytes_reduced(&bytes)
}

impl Sm2ExchangeParty {
    /// Creates a party from existing static and ephemeral secret keys
    pub fn new(
        role: Role,
        static_key: &[u8; SM2_SCALAR_SIZE],
        ephemeral_key: &[u8; SM2_SCALAR_SIZE],
        id: &[u8],
    ) -> Result<Self> {
        let static_d = Scalar::from_canonical_bytes(static_key)?;
        let ephemeral_d = Scalar::from_canonical_bytes(ephemeral_key)?;
        let static_q = scalar_mult_base_g(&static_d);
        let ephemeral_q = scalar_mult_base_g(&ephemeral_d);
        Ok(Sm2ExchangeParty {
            role,
            static_d,
            ephemeral_d,
            static_q,
            ephemeral_q,
            id: id.to_vec(),
        })
    }

    /// Creates a party with fresh static and ephemeral keys
    pub fn generate<R: CryptoRng + RngCore>(role: Role, id: &[u8], rng: &mut R) -> Result<Self> {
        let (static_d, static_q) = generate_keypair(rng)?;
        let (ephemeral_d, ephemeral_q) = generate_keypair(rng)?;
        Ok(Sm2ExchangeParty {
            role,
            static_d,
            ephemeral_d,
            static_q,
            ephemeral_q,
            id: id.to_vec(),
        })
    }

    /// The bundle to send to the peer
    pub fn public(&self) -> Sm2ExchangePublic {
        Sm2ExchangePublic {
            static_point: self.static_q.serialize_uncompressed(),
            ephemeral_point: self.ephemeral_q.serialize_uncompressed(),
            id: self.id.clone(),
        }
    }

    /// Runs the key agreement against the peer's bundle
    ///
    /// With cofactor 1 every on-curve point lies in the prime-order
    /// subgroup, so peer validation is the curve-equation and identity
    /// check plus the full static key validation.
    pub fn derive(&self, peer: &Sm2ExchangePublic, key_len: usize) -> Result<Sm2SharedSecret> {
        let peer_static = Point::deserialize_uncompressed(&peer.static_point)
            .map_err(|_| Error::InvalidPeerKey("Static key is not a curve point"))?;
        validate_public_key(&peer_static)
            .map_err(|_| Error::InvalidPeerKey("Static key validation failed"))?;
        let peer_ephemeral = Point::deserialize_uncompressed(&peer.ephemeral_point)
            .map_err(|_| Error::InvalidPeerKey("Ephemeral key is not a curve point"))?;
        if peer_ephemeral.is_identity() {
            return Err(Error::InvalidPeerKey("Ephemeral key is the identity"));
        }

        // t = (d + x̄_own · r) mod n
        let x_bar_own = reduce_x(&self.ephemeral_q.x_coordinate_bytes());
        let t = self.static_d.add_mod_n(&x_bar_own.mul_mod_n(&self.ephemeral_d));

        // U = [t]P_peer + [t · x̄_peer]R_peer
        let x_bar_peer = reduce_x(&peer_ephemeral.x_coordinate_bytes());
        let k2 = t.mul_mod_n(&x_bar_peer);
        let u = peer_static.mul(&t).add(&peer_ephemeral.mul(&k2));
        if u.is_identity() {
            return Err(Error::Authentication("Joint point degenerated"));
        }

        let xu = u.x_coordinate_bytes();
        let yu = u.y_coordinate_bytes();

        let z_own = compute_z(&self.id, &self.static_q)?;
        let z_peer = compute_z(&peer.id, &peer_static)?;
        let (z_initiator, z_responder) = match self.role {
            Role::Initiator => (&z_own, &z_peer),
            Role::Responder => (&z_peer, &z_own),
        };
        let (r_initiator, r_responder) = match self.role {
            Role::Initiator => (&self.ephemeral_q, &peer_ephemeral),
            Role::Responder => (&peer_ephemeral, &self.ephemeral_q),
        };

        let key = {
            let mut ikm = Zeroizing::new(Vec::with_capacity(4 * SM2_FIELD_ELEMENT_SIZE));
            ikm.extend_from_slice(&xu);
            ikm.extend_from_slice(&yu);
            ikm.extend_from_slice(z_initiator);
            ikm.extend_from_slice(z_responder);
            let kdf = X963Kdf::<Sm3>::new();
            Zeroizing::new(kdf.derive_key(&ikm, key_len)?)
        };

        // transcript digest shared by both confirmation tags
        let inner = {
            let mut hasher = Sm3::new();
            hasher.update(&xu)?;
            hasher.update(z_initiator)?;
            hasher.update(z_responder)?;
            hasher.update(&r_initiator.x_coordinate_bytes())?;
            hasher.update(&r_initiator.y_coordinate_bytes())?;
            hasher.update(&r_responder.x_coordinate_bytes())?;
            hasher.update(&r_responder.y_coordinate_bytes())?;
            hasher.finalize()?
        };

        let tag_to_initiator = confirmation_tag(0x02, &yu, inner.as_ref())?;
        let tag_to_responder = confirmation_tag(0x03, &yu, inner.as_ref())?;

        let (outbound, inbound) = match self.role {
            Role::Initiator => (tag_to_responder, tag_to_initiator),
            Role::Responder => (tag_to_initiator, tag_to_responder),
        };

        Ok(Sm2SharedSecret {
            key,
            outbound,
            inbound,
        })
    }
}

fn confirmation_tag(
    prefix: u8,
    yu: &[u8; SM2_FIELD_ELEMENT_SIZE],
    inner: &[u8],
) -> Result<[u8; TAG_SIZE]> {
    let mut hasher = Sm3::new();
    hasher.update(&[prefix])?;
    hasher.update(yu)?;
    hasher.update(inner)?;
    let digest = hasher.finalize()?;
    let mut out = [0u8; TAG_SIZE];
    out.copy_from_slice(digest.as_ref());
    Ok(out)
}
