//! Integration tests for the gmcrypt workspace
//!
//! The tests in `tests/` exercise the schemes through the facade crate the
//! way an application would, rather than through crate internals.
