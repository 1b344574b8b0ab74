//! Common implementations and shared functionality for the gmcrypt library
//!
//! Provides the secure-memory building blocks (zeroized buffers and guards)
//! used by the algorithm and scheme crates for handling key material and
//! intermediate secrets.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod security;

pub use security::{EphemeralSecret, SecretBuffer, SecureZeroingType, ZeroizeGuard};
