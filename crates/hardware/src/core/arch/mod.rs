//! RISC-V architecture-specific components.
//!
//! Holds the architectural register state of the simulated hart.

/// General-Purpose Register file implementation.
pub mod gpr;

pub use gpr::Gpr;
