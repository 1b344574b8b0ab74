//! SM2 digital signatures over the SM3 hash function
//!
//! Implements the signature scheme of GB/T 32918.2: the message digest is
//! `SM3(Z || M)` where Z binds the signer's identity and public key, and
//! signatures travel as DER `SEQUENCE { r INTEGER, s INTEGER }`.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod sm2;

pub use sm2::{Sm2, Sm2PublicKey, Sm2SecretKey, Sm2Signature, Sm2Signer, Sm2Verifier};
