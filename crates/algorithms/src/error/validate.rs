//! Validation guards for the primitive implementations
//!
//! One-line precondition checks so every violation surfaces through the
//! same error shape.

use super::{Error, Result};

/// Checks an arbitrary precondition on a named parameter
#[inline(always)]
pub fn parameter(condition: bool, name: &'static str, reason: &'static str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::param(name, reason))
    }
}

/// Checks an upper bound on a length or index
#[inline(always)]
pub fn max_length(context: &'static str, actual: usize, max: usize) -> Result<()> {
    if actual > max {
        return Err(Error::Length {
            context,
            expected: max,
            actual,
        });
    }
    Ok(())
}
