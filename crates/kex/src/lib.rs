//! SM2 two-party authenticated key exchange
//!
//! Implements the protocol of GB/T 32918.3. Each party combines its static
//! and ephemeral keys into a joint point U, derives the session key through
//! the SM3 KDF, and exchanges SM3 confirmation tags bound to both
//! identities and both ephemeral points.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod sm2;

pub use error::{Error, Result};
pub use sm2::{Role, Sm2ExchangeParty, Sm2ExchangePublic, Sm2SharedSecret};
