//! SM2 public-key encryption scheme
//!
//! Ciphertexts are `C1 || C2 || C3` (or `C1 || C3 || C2`): C1 is the
//! ephemeral point as 65 uncompressed bytes, C2 the keystream-masked
//! plaintext, and C3 the SM3 binding tag `SM3(x2 || M || y2)`.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::vec::Vec;

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use gmcrypt_algorithms::ec::sm2::{
    base_point_g, generate_keypair, validate_public_key, Point, Scalar,
};
use gmcrypt_algorithms::hash::{HashFunction, Sm3};
use gmcrypt_algorithms::kdf::{KeyDerivationFunction, X963Kdf};
use gmcrypt_common::security::SecretBuffer;
use gmcrypt_internal::constant_time::ct_eq;
use gmcrypt_params::sm2::{
    SM2_FIELD_ELEMENT_SIZE, SM2_POINT_UNCOMPRESSED_SIZE, SM2_SCALAR_SIZE,
};

use crate::error::{Error, Result};


/// Size of the C3 binding tag
const TAG_SIZE: usize = 32;

/// Ciphertext component ordering
///
/// GB/T 32918.4 originally specified C1C2C3; the 2012 revision moved the
/// tag before the masked plaintext. Both orderings remain in active use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CiphertextMode {
    #[default]
    C1C2C3,
    C1C3C2,
}

/// Recipient public key as an uncompressed point encoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sm2PublicKey([u8; SM2_POINT_UNCOMPRESSED_SIZE]);

impl Sm2PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let point = Point::deserialize_uncompressed(bytes)?;
        validate_public_key(&point)?;
        Ok(Sm2PublicKey(point.serialize_uncompressed()))
    }

    fn to_point(&self) -> Result<Point> {
        Ok(Point::deserialize_uncompressed(&self.0)?)
    }
}

impl AsRef<[u8]> for Sm2PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recipient secret key
#[derive(Clone, Zeroize)]
pub struct Sm2SecretKey(SecretBuffer<SM2_SCALAR_SIZE>);

impl Sm2SecretKey {
    pub fn from_bytes(bytes: &[u8; SM2_SCALAR_SIZE]) -> Result<Self> {
        // strict range check; the buffer keeps the canonical encoding
        Scalar::from_canonical_bytes(bytes)?;
        Ok(Sm2SecretKey(SecretBuffer::new(*bytes)))
    }

    fn to_scalar(&self) -> Result<Scalar> {
        let mut bytes = [0u8; SM2_SCALAR_SIZE];
        bytes.copy_from_slice(self.0.as_ref());
        let scalar = Scalar::from_canonical_bytes(&bytes);
        bytes.zeroize();
        Ok(scalar?)
    }
}

impl AsRef<[u8]> for Sm2SecretKey {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

/// An SM2 ciphertext
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sm2Ciphertext(Vec<u8>);

impl Sm2Ciphertext {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Sm2Ciphertext(bytes.to_vec())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Sm2Ciphertext {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The SM2 encryption scheme
pub struct Sm2Pke;

impl Sm2Pke {
    /// Fixed ciphertext expansion: C1 plus C3
    pub const OVERHEAD: usize = SM2_POINT_UNCOMPRESSED_SIZE + TAG_SIZE;

    /// Ciphertext size for a given plaintext length
    pub fn output_size(plaintext_len: usize) -> usize {
        Self::OVERHEAD + plaintext_len
    }

    pub fn keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<(Sm2PublicKey, Sm2SecretKey)> {
        let (d, q) = generate_keypair(rng)?;
        let sk = Sm2SecretKey(SecretBuffer::new(d.serialize()));
        Ok((Sm2PublicKey(q.serialize_uncompressed()), sk))
    }

    /// Encrypts with the default C1C2C3 ordering
    pub fn encrypt<R: CryptoRng + RngCore>(
        public_key: &Sm2PublicKey,
        plaintext: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        Self::encrypt_with_mode(public_key, plaintext, CiphertextMode::default(), rng)
    }

    pub fn encrypt_with_mode<R: CryptoRng + RngCore>(
        public_key: &Sm2PublicKey,
        plaintext: &[u8],
        mode: CiphertextMode,
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        if plaintext.is_empty() {
            return Err(Error::EncryptionFailed("Plaintext must not be empty"));
        }
        let q = public_key.to_point()?;
        let g = base_point_g();
        let kdf = X963Kdf::<Sm3>::new();

        loop {
            let k = random_scalar(rng);
            let c1 = g.mul(&k);
            let shared = q.mul(&k);
            if shared.is_identity() {
                continue;
            }

            let x2 = shared.x_coordinate_bytes();
            let y2 = shared.y_coordinate_bytes();

            let keystream = {
                let mut ikm = [0u8; 2 * SM2_FIELD_ELEMENT_SIZE];
                ikm[..SM2_FIELD_ELEMENT_SIZE].copy_from_slice(&x2);
                ikm[SM2_FIELD_ELEMENT_SIZE..].copy_from_slice(&y2);
                let out = Zeroizing::new(kdf.derive_key(&ikm, plaintext.len())?);
                ikm.zeroize();
                out
            };
            // an all-zero keystream would leak the plaintext verbatim
            if X963Kdf::<Sm3>::is_all_zero(&keystream) {
                continue;
            }

            let mut c2 = Vec::with_capacity(plaintext.len());
            for (p, t) in plaintext.iter().zip(keystream.iter()) {
                c2.push(p ^ t);
            }

            let c3 = binding_tag(&x2, plaintext, &y2)?;

            let mut out = Vec::with_capacity(Self::output_size(plaintext.len()));
            out.extend_from_slice(&c1.serialize_uncompressed());
            match mode {
                CiphertextMode::C1C2C3 => {
                    out.extend_from_slice(&c2);
                    out.extend_from_slice(&c3);
                }
                CiphertextMode::C1C3C2 => {
                    out.extend_from_slice(&c3);
                    out.extend_from_slice(&c2);
                }
            }
            return Ok(out);
        }
    }

    /// Decrypts with the default C1C2C3 ordering
    pub fn decrypt(secret_key: &Sm2SecretKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
        Self::decrypt_with_mode(secret_key, ciphertext, CiphertextMode::default())
    }

    pub fn decrypt_with_mode(
        secret_key: &Sm2SecretKey,
        ciphertext: &[u8],
        mode: CiphertextMode,
    ) -> Result<Vec<u8>> {
        if ciphertext.len() <= Self::OVERHEAD {
            return Err(Error::InvalidCiphertextFormat(
                "Ciphertext too short for C1, C3, and a nonempty C2",
            ));
        }

        let c1 = Point::deserialize_uncompressed(&ciphertext[..SM2_POINT_UNCOMPRESSED_SIZE])
            .map_err(|_| Error::InvalidCiphertextFormat("C1 is not a curve point"))?;
        if c1.is_identity() {
            return Err(Error::InvalidCiphertextFormat("C1 is the identity"));
        }

        let body = &ciphertext[SM2_POINT_UNCOMPRESSED_SIZE..];
        let (c2, c3): (&[u8], &[u8]) = match mode {
            CiphertextMode::C1C2C3 => {
                let split = body.len() - TAG_SIZE;
                (&body[..split], &body[split..])
            }
            CiphertextMode::C1C3C2 => (&body[TAG_SIZE..], &body[..TAG_SIZE]),
        };

        let d = secret_key.to_scalar()?;
        let shared = c1.mul(&d);
        if shared.is_identity() {
            return Err(Error::DecryptionFailed("Degenerate shared point"));
        }

        let x2 = shared.x_coordinate_bytes();
        let y2 = shared.y_coordinate_bytes();

        let keystream = {
            let mut ikm = [0u8; 2 * SM2_FIELD_ELEMENT_SIZE];
            ikm[..SM2_FIELD_ELEMENT_SIZE].copy_from_slice(&x2);
            ikm[SM2_FIELD_ELEMENT_SIZE..].copy_from_slice(&y2);
            let kdf = X963Kdf::<Sm3>::new();
            let out = Zeroizing::new(kdf.derive_key(&ikm, c2.len())?);
            ikm.zeroize();
            out
        };
        if X963Kdf::<Sm3>::is_all_zero(&keystream) {
            return Err(Error::DecryptionFailed("Degenerate keystream"));
        }

        let mut plaintext = Vec::with_capacity(c2.len());
        for (c, t) in c2.iter().zip(keystream.iter()) {
            plaintext.push(c ^ t);
        }

        let expected_tag = binding_tag(&x2, &plaintext, &y2)?;
        if !ct_eq(&expected_tag[..], c3) {
            plaintext.zeroize();
            return Err(Error::DecryptionFailed("Tag mismatch"));
        }

        Ok(plaintext)
    }
}

fn binding_tag(
    x2: &[u8; SM2_FIELD_ELEMENT_SIZE],
    message: &[u8],
    y2: &[u8; SM2_FIELD_ELEMENT_SIZE],
) -> Result<[u8; TAG_SIZE]> {
    let mut hasher = Sm3::new();
    hasher.update(x2)?;
    hasher.update(message)?;
    hasher.update(y2)?;
    let digest = hasher.finalize()?;
    let mut out = [0u8; TAG_SIZE];
    out.copy_from_slice(digest.as_ref());
    Ok(out)
}

fn random_scalar<R: CryptoRng + RngCore>(rng: &mut R) -> Scalar {
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

impl gmcrypt_api::Pke for Sm2Pke {
    type PublicKey = Sm2PublicKey;
    type SecretKey = Sm2SecretKey;
    type Ciphertext = Sm2Ciphertext;

    fn name() -> &'static str {
        "SM2-PKE"
    }

    fn keypair<R: CryptoRng + RngCore>(
        rng: &mut R,
    ) -> gmcrypt_api::Result<(Self::PublicKey, Self::SecretKey)> {
        Ok(Sm2Pke::keypair(rng)?)
    }

    fn encrypt<R: RngCore + CryptoRng>(
        pk_recipient: &Self::PublicKey,
        plaintext: &[u8],
        aad: Option<&[u8]>,
        rng: &mut R,
    ) -> gmcrypt_api::Result<Self::Ciphertext> {
        if aad.map_or(false, |a| !a.is_empty()) {
            return Err(Error::UnsupportedOperation("SM2 encryption has no AAD input").into());
        }
        let bytes = Sm2Pke::encrypt(pk_recipient, plaintext, rng)?;
        Ok(Sm2Ciphertext(bytes))
    }

    fn decrypt(
        sk_recipient: &Self::SecretKey,
        ciphertext: &Self::Ciphertext,
        aad: Option<&[u8]>,
    ) -> gmcrypt_api::Result<Vec<u8>> {
        if aad.map_or(false, |a| !a.is_empty()) {
            return Err(Error::UnsupportedOperation("SM2 encryption has no AAD input").into());
        }
        Ok(Sm2Pke::decrypt(sk_recipient, ciphertext.as_ref())?)
    }
}
