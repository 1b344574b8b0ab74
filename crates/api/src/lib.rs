//! Public API traits and types for the gmcrypt library
//!
//! This crate provides the public API surface for the gmcrypt ecosystem:
//! trait definitions for the signature and public-key encryption schemes and
//! the shared error type the scheme crates converge on.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

pub mod error;
pub mod traits;

// Re-export commonly used items at the crate level for convenience
pub use error::{Error, Result};

pub use traits::{Pke, Signature};

// Re-export trait modules for direct access
pub use traits::{pke, signature};
