//! Constants for hash functions

/// Output size of SM3 in bytes
pub const SM3_OUTPUT_SIZE: usize = 32;

/// Internal block size of SM3 in bytes
pub const SM3_BLOCK_SIZE: usize = 64;
