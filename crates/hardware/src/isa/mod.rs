//! Instruction Set Architecture (ISA) definitions.
//!
//! Contains the register naming conventions and the decoded instruction
//! representation shared by the assembler and the execution engine.
//!
//! * `abi`: register names and operand parsing.
//! * `instruction`: the `Instruction` enum and its canonical text form.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Decoded instruction representation and rendering.
pub mod instruction;

pub use instruction::{AluOp, BranchCond, Instruction, LoadWidth, StoreWidth};
