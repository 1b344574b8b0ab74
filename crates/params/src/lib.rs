//! Constant values for the gmcrypt library
//!
//! Domain parameters are plain value objects: constructed once as statics,
//! immutable, and shared by reference. There is no lazy initialization and
//! no global mutable state behind them.

#![no_std]

pub mod sm2;
pub mod utils;
