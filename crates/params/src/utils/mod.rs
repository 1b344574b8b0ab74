//! Shared size constants

pub mod hash;
