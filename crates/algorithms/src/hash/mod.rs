//! Hash function implementations
//!
//! The SM2 schemes are defined over SM3, but the interface is kept behind a
//! trait so the KDF and protocol code state their requirements explicitly.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::string::String;

use crate::error::Result;

pub mod sm3;

// Re-exports
pub use sm3::Sm3;

/// Marker trait describing a hash algorithm's static properties
pub trait HashAlgorithm {
    /// Digest size in bytes
    const OUTPUT_SIZE: usize;
    /// Internal block size in bytes
    const BLOCK_SIZE: usize;
    /// Human-readable algorithm identifier
    const ALGORITHM_ID: &'static str;
}

/// Trait for cryptographic hash functions
///
/// Implementations are `Clone`: cloning the running state is the
/// save/restore mechanism streaming callers rely on (for example to keep a
/// precomputed prefix hashed once and branch off per message).
pub trait HashFunction: Clone {
    /// Marker type carrying the algorithm constants
    type Algorithm: HashAlgorithm;

    /// Digest output type
    type Output: AsRef<[u8]> + Clone;

    /// Creates a new instance of the hash function
    fn new() -> Self;

    /// Updates the hash function state with new data
    fn update(&mut self, data: &[u8]) -> Result<&mut Self>;

    /// Finalizes the hash computation and returns the digest
    ///
    /// The state is wiped afterwards; reuse requires a fresh instance or a
    /// clone taken before finalizing.
    fn finalize(&mut self) -> Result<Self::Output>;

    /// Returns the output size of the hash function in bytes
    fn output_size() -> usize;

    /// Returns the block size of the hash function in bytes
    fn block_size() -> usize;

    /// Returns the name of the hash function
    fn name() -> String;

    /// Convenience method to hash data in a single call
    fn digest(data: &[u8]) -> Result<Self::Output>
    where
        Self: Sized,
    {
        let mut hasher = Self::new();
        hasher.update(data)?;
        hasher.finalize()
    }
}
