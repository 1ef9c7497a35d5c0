//! Shared helpers for shell tests.

/// Program files and shell construction.
pub mod fixtures;
