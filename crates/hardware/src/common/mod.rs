//! Common utilities and types used throughout the simulator.
//!
//! This module provides the building blocks shared by the assembler and the
//! execution engine. It includes:
//! 1. **Constants:** Word sizes and immediate ranges.
//! 2. **Error Handling:** Assembly and execution error types.
//! 3. **Register Identity:** The `Reg` type and its canonical ordering.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types for assembly and execution.
pub mod error;

/// Register identifiers and names.
pub mod reg;

pub use error::{AsmError, SimError};
pub use reg::Reg;
