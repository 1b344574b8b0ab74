//! # gmcrypt
//!
//! A modular implementation of the SM2 public-key cryptosystem (GB/T 32918)
//! together with the SM3 hash function it is defined over.
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`gmcrypt-algorithms`]: SM3, the SM2 curve engine (field, point, scalar,
//!   multipliers) and the key derivation function
//! - [`gmcrypt-sign`]: the SM2 digital signature scheme
//! - [`gmcrypt-pke`]: SM2 public-key encryption
//! - [`gmcrypt-kex`]: the SM2 two-party authenticated key exchange
//!
//! ## Example
//!
//! ```ignore
//! use gmcrypt::prelude::*;
//! use gmcrypt::sign::sm2::Sm2;
//!
//! let mut rng = rand::thread_rng();
//! let (pk, sk) = Sm2::keypair(&mut rng)?;
//! let sig = Sm2::sign(b"message", &sk)?;
//! Sm2::verify(b"message", &sig, &pk)?;
//! # Ok::<(), gmcrypt::api::Error>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub use gmcrypt_api as api;
pub use gmcrypt_common as common;
pub use gmcrypt_internal as internal;
pub use gmcrypt_params as params;

pub use gmcrypt_algorithms as algorithms;
pub use gmcrypt_kex as kex;
pub use gmcrypt_pke as pke;
pub use gmcrypt_sign as sign;

// Re-exported so downstream crates can name the exact versions gmcrypt uses
pub use rand;
pub use subtle;
pub use zeroize;

/// Common imports for gmcrypt users
pub mod prelude {
    // Error types
    pub use crate::api::{Error, Result};

    // Core traits
    pub use crate::api::{Pke, Signature};

    // Security types
    pub use crate::common::security::{
        EphemeralSecret, SecretBuffer, SecureZeroingType, ZeroizeGuard,
    };

    // The high-level schemes
    pub use crate::kex::sm2::{Role, Sm2ExchangeParty};
    pub use crate::pke::sm2::{CiphertextMode, Sm2Pke};
    pub use crate::sign::sm2::{Sm2, Sm2Signer, Sm2Verifier};
}
