//! Cryptographic primitives for the gmcrypt library
//!
//! This crate implements the primitives the SM2 schemes are built from:
//!
//! - [`hash::sm3`]: the SM3 hash function (GB/T 32905)
//! - [`kdf`]: the counter-mode key derivation function of GB/T 32918
//! - [`ec::sm2`]: prime-field arithmetic, point operations, scalars and
//!   scalar-multiplication strategies for the SM2 curve
//!
//! All field, point, and scalar operations avoid data-dependent branches on
//! secret values; key material lives in zeroized buffers.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod ec;
pub mod error;
pub mod hash;
pub mod kdf;
pub mod types;

pub use error::{Error, Result};
