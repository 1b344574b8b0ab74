//! Common types for cryptographic primitives

mod digest;

pub use digest::Digest;

/// Trait for types that can be compared in constant time
pub trait ConstantTimeEq {
    /// Compare two values without data-dependent branches
    fn ct_eq(&self, other: &Self) -> bool;
}
