//! Core processor implementation.
//!
//! This module contains the architectural register state and the execution
//! units used by the simulator's single-cycle interpreter.

/// Architecture-specific components (register file).
pub mod arch;

/// Execution units (ALU).
pub mod units;
