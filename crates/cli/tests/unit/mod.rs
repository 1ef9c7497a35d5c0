//! # Unit Components
//!
//! Tests for each layer of the shell, from rendering up to whole sessions.


/// Trace line rendering.
pub mod diff;

/// Directive parsing, guards, and the input loop.
pub mod dispatch;
