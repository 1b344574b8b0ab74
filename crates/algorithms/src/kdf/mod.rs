//! Key derivation functions
//!
//! SM2 encryption and key exchange both stretch a shared secret through the
//! counter-mode construction of GB/T 32918.3 (the same shape as ANSI X9.63):
//! `K = H(Z || 1) || H(Z || 2) || ...` truncated to the requested length,
//! with a 32-bit big-endian counter starting at 1.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::string::String;
#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::vec::Vec;

use byteorder::{BigEndian, ByteOrder};
use core::marker::PhantomData;

use crate::error::{validate, Result};
use crate::hash::HashFunction;

/// Trait for key derivation functions
pub trait KeyDerivationFunction {
    /// Creates a new instance
    fn new() -> Self;

    /// Derives `length` bytes of key material from the input keying material
    fn derive_key(&self, ikm: &[u8], length: usize) -> Result<Vec<u8>>;

    /// Returns the name of the KDF
    fn name() -> String;
}

/// Counter-mode KDF over a generic hash function
#[derive(Clone)]
pub struct X963Kdf<H: HashFunction> {
    _hash: PhantomData<H>,
}

impl<H: HashFunction> X963Kdf<H> {
    /// Returns true when every derived byte is zero
    ///
    /// SM2 encryption must reject an all-zero keystream and retry with a
    /// fresh ephemeral scalar, so the check lives next to the derivation.
    pub fn is_all_zero(key: &[u8]) -> bool {
        key.iter().fold(0u8, |acc, &b| acc | b) == 0
    }
}

impl<H: HashFunction> KeyDerivationFunction for X963Kdf<H> {
    fn new() -> Self {
        Self { _hash: PhantomData }
    }

    fn derive_key(&self, ikm: &[u8], length: usize) -> Result<Vec<u8>> {
        validate::parameter(length > 0, "length", "KDF output length must be positive")?;

        let digest_size = H::output_size();
        let mut out = Vec::with_capacity(length);
        let mut counter: u32 = 1;
        let mut counter_bytes = [0u8; 4];

        while out.len() < length {
            BigEndian::write_u32(&mut counter_bytes, counter);
            let mut hasher = H::new();
            hasher.update(ikm)?;
            hasher.update(&counter_bytes)?;
            let block = hasher.finalize()?;

            let take = core::cmp::min(digest_size, length - out.len());
            out.extend_from_slice(&block.as_ref()[..take]);
            counter = counter.wrapping_add(1);
        }

        Ok(out)
    }

    fn name() -> String {
        let mut name = String::from("X9.63-KDF/");
        name.push_str(&H::name());
        name
    }
}
