//! Security primitives and memory safety utilities
//!
//! Foundational types for handling sensitive cryptographic material: fixed
//! size secret buffers, ephemeral wrappers for intermediate values, and
//! scope guards that zeroize on exit.

pub mod secret;

pub use secret::{EphemeralSecret, SecretBuffer, SecureZeroingType, ZeroizeGuard};
