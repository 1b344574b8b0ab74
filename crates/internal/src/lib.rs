//! Internal utilities for the gmcrypt library
//!
//! Shared low-level helpers that the other crates build on. Nothing in here
//! is specific to one scheme; everything is specific to doing cryptography
//! without data-dependent branches.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod constant_time;
