//! ALU arithmetic operations.
//!
//! Implements integer addition, subtraction, multiplication, and division
//! for RV32. Division by zero and signed overflow follow the RISC-V rules
//! (quotient all ones, remainder equals the dividend) instead of trapping.

use crate::isa::AluOp;

/// Number of bits in a 32-bit word (used for high-multiply shift).
const WORD_BITS: u32 = 32;

/// Executes an integer arithmetic operation.
///
/// Returns `0` for non-arithmetic opcodes.
pub fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Mul => a.wrapping_mul(b),
        AluOp::Mulh => ((a as i32 as i64 * b as i32 as i64) >> WORD_BITS) as u32,
        AluOp::Mulhu => ((a as u64 * b as u64) >> WORD_BITS) as u32,
        AluOp::Div => {
            if b == 0 {
                u32::MAX
            } else {
                (a as i32).wrapping_div(b as i32) as u32
            }
        }
        AluOp::Divu => a.checked_div(b).unwrap_or(u32::MAX),
        AluOp::Rem => {
            if b == 0 {
                a
            } else {
                (a as i32).wrapping_rem(b as i32) as u32
            }
        }
        AluOp::Remu => a.checked_rem(b).unwrap_or(a),
        _ => 0,
    }
}
