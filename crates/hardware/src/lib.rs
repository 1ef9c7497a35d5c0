//! RV32 reference machine library.
//!
//! This crate implements a small instruction-level RISC-V simulator with the following:
//! 1. **Assembler:** Two-pass assembly of RV32IM source, including pseudo-instructions.
//! 2. **Core:** Register file and integer ALU.
//! 3. **Memory:** Sparse byte-addressed memory covering the 32-bit address space.
//! 4. **Simulation:** Single-step and run-to-completion execution with per-step
//!    change tracking of registers and memory.

/// Two-pass assembler (lexer, pseudo-instruction expansion, layout).
pub mod asm;
/// Common types and constants (errors, register identifiers).
pub mod common;
/// Machine configuration (memory map, execution limits).
pub mod config;
/// CPU core (register file, ALU).
pub mod core;
/// Instruction set (ABI names, decoded instructions).
pub mod isa;
/// Simulator and change tracking.
pub mod sim;
/// System memory.
pub mod soc;

/// Source information for an assembled instruction.
pub use crate::asm::SourceRecord;
/// Error types raised by assembly and execution.
pub use crate::common::{AsmError, Reg, SimError};
/// Machine configuration; use `MachineConfig::default()` or deserialize from JSON.
pub use crate::config::MachineConfig;
/// Main simulator type and its per-step change records.
pub use crate::sim::{ChangeRecord, Simulator, StepOutcome};
