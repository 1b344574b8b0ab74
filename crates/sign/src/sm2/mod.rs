//! SM2 signature scheme over SM3
//!
//! Signing hashes `SM3(Z || M)` where Z is the identity digest of the
//! signer, then computes `r = (e + x1) mod n` and
//! `s = (1 + d)^-1 (k - r d) mod n` with a fresh ephemeral scalar k per
//! signature. Verification is strict about encoding but never panics on
//! malformed input; it just reports the signature as invalid.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::vec::Vec;

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use gmcrypt_algorithms::ec::sm2::{
    base_point_g, compute_z, generate_keypair, scalar_mult_base_g, validate_public_key,
    FixedPointCombMultiplier, Point, Scalar, ScalarMultiplier,
};
use gmcrypt_algorithms::hash::{HashFunction, Sm3};
use gmcrypt_api::traits::signature::{PublicKeyBytes, SignatureBytes};
use gmcrypt_api::{Error, Result};
use gmcrypt_internal::constant_time::ct_eq;
use gmcrypt_params::sm2::{
    SM2_DEFAULT_USER_ID, SM2_POINT_UNCOMPRESSED_SIZE, SM2_SCALAR_SIZE,
};

mod der;
pub use der::SignatureComponents;


/// An SM2 public key as an uncompressed point encoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sm2PublicKey([u8; SM2_POINT_UNCOMPRESSED_SIZE]);

impl Sm2PublicKey {
    pub(crate) fn from_point(point: &Point) -> Self {
        Sm2PublicKey(point.serialize_uncompressed())
    }

    pub(crate) fn to_point(&self) -> Result<Point> {
        let point = Point::deserialize_uncompressed(&self.0)?;
        validate_public_key(&point)?;
        Ok(point)
    }
}

impl AsRef<[u8]> for Sm2PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PublicKeyBytes for Sm2PublicKey {
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let point = Point::deserialize_uncompressed(bytes)?;
        validate_public_key(&point)?;
        Ok(Sm2PublicKey::from_point(&point))
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

/// An SM2 secret key, a scalar in `[1, n - 1]`
#[derive(Clone, Zeroize)]
pub struct Sm2SecretKey(Scalar);

impl Sm2SecretKey {
    /// Parses a canonical big-endian scalar encoding
    pub fn from_bytes(bytes: &[u8; SM2_SCALAR_SIZE]) -> Result<Self> {
        let scalar = Scalar::from_canonical_bytes(bytes)
            .map_err(|_| gmcrypt_algorithms::error::Error::param(
                "SecretKey",
                "Secret key must be in [1, n - 1]",
            ))?;
        Ok(Sm2SecretKey(scalar))
    }

    /// Exports the key; the returned buffer is wiped on drop
    pub fn to_bytes(&self) -> Zeroizing<[u8; SM2_SCALAR_SIZE]> {
        Zeroizing::new(self.0.serialize())
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        &self.0
    }
}

/// A DER-encoded SM2 signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sm2Signature(Vec<u8>);

impl AsRef<[u8]> for Sm2Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl SignatureBytes for Sm2Signature {
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        // parse to reject garbage early; the canonical bytes are kept as-is
        SignatureComponents::from_der(bytes)?;
        Ok(Sm2Signature(bytes.to_vec()))
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.0.clone()
    }
}

fn scalar_one() -> Scalar {
    let mut bytes = [0u8; SM2_SCALAR_SIZE];
    bytes[SM2_SCALAR_SIZE - 1] = 1;
    Scalar::from_bytes_reduced(&bytes)
}

fn random_nonzero_scalar<R: CryptoRng + RngCore>(rng: &mut R) -> Scalar {
    // rejection sampling keeps the distribution uniform over [1, n - 1]
    loop {
        let mut bytes = [0u8; SM2_SCALAR_SIZE];
        rng.fill_bytes(&mut bytes);
        let parsed = Scalar::from_canonical_bytes(&bytes);
        bytes.zeroize();
        if let Ok(k) = parsed {
            return k;
        }
    }
}

/// Streaming signer bound to one secret key and identity
///
/// The Z digest and the `(1 + d)^-1` factor are computed once at
/// construction, as is the fixed-base comb table, so repeated signatures
/// only pay for the per-message work.
pub struct Sm2Signer {
    d: Scalar,
    inv_one_plus_d: Scalar,
    public_key: Sm2PublicKey,
    comb: FixedPointCombMultiplier,
    baseline: Sm3,
    hasher: Sm3,
}

impl Sm2Signer {
    /// Creates a signer; `user_id` defaults to the distinguished identity
    pub fn new(secret_key: &Sm2SecretKey, user_id: Option<&[u8]>) -> Result<Self> {
        let d = secret_key.scalar().clone();
        let q = scalar_mult_base_g(&d);

        // d = n - 1 would make (1 + d) zero and the scheme undefined
        let inv_one_plus_d = scalar_one()
            .add_mod_n(&d)
            .inv_mod_n()
            .map_err(|_| {
                gmcrypt_algorithms::error::Error::param(
                    "SecretKey",
                    "Secret key has no defined signing transform",
                )
            })?;

        let z = compute_z(user_id.unwrap_or(SM2_DEFAULT_USER_ID), &q)?;
        let mut baseline = Sm3::new();
        baseline.update(&z)?;
        let hasher = baseline.clone();

        Ok(Sm2Signer {
            d,
            inv_one_plus_d,
            public_key: Sm2PublicKey::from_point(&q),
            comb: FixedPointCombMultiplier::new(base_point_g()),
            baseline,
            hasher,
        })
    }

    pub fn public_key(&self) -> Sm2PublicKey {
        self.public_key.clone()
    }

    /// Absorbs message bytes
    pub fn update(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.hasher.update(data)?;
        Ok(self)
    }

    /// Discards any absorbed message bytes
    pub fn reset(&mut self) {
        self.hasher = self.baseline.clone();
    }

    /// Signs the absorbed message and resets for the next one
    pub fn sign<R: CryptoRng + RngCore>(&mut self, rng: &mut R) -> Result<Sm2Signature> {
        let digest = {
            let mut hasher = self.hasher.clone();
            hasher.finalize()?
        };
        self.reset();

        let mut e_bytes = [0u8; SM2_SCALAR_SIZE];
        e_bytes.copy_from_slice(digest.as_ref());
        let e = Scalar::from_bytes_reduced(&e_bytes);

        loop {
            let k = random_nonzero_scalar(rng);
            let p1 = self.comb.multiply(&k);
            let x1 = Scalar::from_bytes_reduced(&p1.x_coordinate_bytes());

            let r = e.add_mod_n(&x1);
            if r.is_zero() || r.add_mod_n(&k).is_zero() {
                continue;
            }

            let s = self
                .inv_one_plus_d
                .mul_mod_n(&k.sub_mod_n(&r.mul_mod_n(&self.d)));
            if s.is_zero() {
                continue;
            }

            let components = SignatureComponents {
                r: r.serialize(),
                s: s.serialize(),
            };
            return Ok(Sm2Signature(components.to_der()));
        }
    }
}

/// Streaming verifier bound to one public key and identity
pub struct Sm2Verifier {
    q: Point,
    baseline: Sm3,
    hasher: Sm3,
}

impl Sm2Verifier {
    /// Creates a verifier after full public key validation
    pub fn new(public_key: &Sm2PublicKey, user_id: Option<&[u8]>) -> Result<Self> {
        let q = public_key.to_point()?;
        let z = compute_z(user_id.unwrap_or(SM2_DEFAULT_USER_ID), &q)?;
        let mut baseline = Sm3::new();
        baseline.update(&z)?;
        let hasher = baseline.clone();
        Ok(Sm2Verifier {
            q,
            baseline,
            hasher,
        })
    }

    /// Absorbs message bytes
    pub fn update(&mut self, data: &[u8]) -> Result<&mut Self> {
        self.hasher.update(data)?;
        Ok(self)
    }

    /// Discards any absorbed message bytes
    pub fn reset(&mut self) {
        self.hasher = self.baseline.clone();
    }

    /// Verifies a DER signature over the absorbed message
    ///
    /// Always returns a boolean; malformed signatures are simply invalid.
    /// The verifier is reset for the next message either way.
    pub fn verify(&mut self, signature: &[u8]) -> bool {
        let outcome = self.verify_inner(signature);
        self.reset();
        outcome
    }

    fn verify_inner(&mut self, signature: &[u8]) -> bool {
        let components = match SignatureComponents::from_der(signature) {
            Ok(c) => c,
            Err(_) => return false,
        };
        let r = match Scalar::from_canonical_bytes(&components.r) {
            Ok(v) => v,
            Err(_) => return false,
        };
        let s = match Scalar::from_canonical_bytes(&components.s) {
            Ok(v) => v,
            Err(_) => return false,
        };

        let t = r.add_mod_n(&s);
        if t.is_zero() {
            return false;
        }

        let digest = {
            let mut hasher = self.hasher.clone();
            match hasher.finalize() {
                Ok(d) => d,
                Err(_) => return false,
            }
        };
        let mut e_bytes = [0u8; SM2_SCALAR_SIZE];
        e_bytes.copy_from_slice(digest.as_ref());
        let e = Scalar::from_bytes_reduced(&e_bytes);

        let point = scalar_mult_base_g(&s).add(&self.q.mul(&t));
        if point.is_identity() {
            return false;
        }

        let x1 = Scalar::from_bytes_reduced(&point.x_coordinate_bytes());
        let expected = e.add_mod_n(&x1);
        ct_eq(expected.serialize(), r.serialize())
    }
}

/// The SM2 signature algorithm as a one-shot API
pub struct Sm2;

#[cfg(feature = "std")]
impl gmcrypt_api::Signature for Sm2 {
    type PublicKey = Sm2PublicKey;
    type SecretKey = Sm2SecretKey;
    type SignatureData = Sm2Signature;
    type KeyPair = (Sm2PublicKey, Sm2SecretKey);

    fn name() -> &'static str {
        "SM2-SM3"
    }

    fn keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self::KeyPair> {
        let (d, q) = generate_keypair(rng)?;
        Ok((Sm2PublicKey::from_point(&q), Sm2SecretKey(d)))
    }

    fn public_key(keypair: &Self::KeyPair) -> Self::PublicKey {
        keypair.0.clone()
    }

    fn secret_key(keypair: &Self::KeyPair) -> Self::SecretKey {
        keypair.1.clone()
    }

    fn sign(message: &[u8], secret_key: &Self::SecretKey) -> Result<Self::SignatureData> {
        let mut signer = Sm2Signer::new(secret_key, None)?;
        signer.update(message)?;
        signer.sign(&mut rand::thread_rng())
    }

    fn verify(
        message: &[u8],
        signature: &Self::SignatureData,
        public_key: &Self::PublicKey,
    ) -> Result<()> {
        let mut verifier = Sm2Verifier::new(public_key, None)?;
        verifier.update(message)?;
        if verifier.verify(signature.as_ref()) {
            Ok(())
        } else {
            Err(Error::InvalidSignature {
                context: "SM2",
                message: String::new(),
            })
        }
    }
}
