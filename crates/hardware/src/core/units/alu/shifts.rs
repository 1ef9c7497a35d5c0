//! ALU shift operations.
//!
//! Implements shift-left logical (SLL), shift-right logical (SRL), and
//! shift-right arithmetic (SRA). Shift amounts are masked to 5 bits (0–31).

use crate::common::constants::SHAMT_MASK;
use crate::isa::AluOp;

/// Executes a shift operation.
///
/// Returns `0` for non-shift opcodes.
pub fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    let shamt = b & SHAMT_MASK;
    match op {
        AluOp::Sll => a.wrapping_shl(shamt),
        AluOp::Srl => a.wrapping_shr(shamt),
        AluOp::Sra => ((a as i32) >> shamt) as u32,
        _ => 0,
    }
}
