//! SM2 public-key encryption
//!
//! Implements the encryption scheme of GB/T 32918.4: an ephemeral
//! Diffie-Hellman point feeds the SM3-based KDF for a one-time keystream,
//! with an SM3 tag binding plaintext and shared point. Both standard
//! component orderings (C1C2C3 and C1C3C2) are supported.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod sm2;

pub use error::{Error, Result};
pub use sm2::{CiphertextMode, Sm2Ciphertext, Sm2Pke, Sm2PublicKey, Sm2SecretKey};
