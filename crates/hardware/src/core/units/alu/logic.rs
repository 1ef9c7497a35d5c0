//! ALU logical and comparison operations.

use crate::isa::AluOp;

/// Executes a bitwise or set-less-than operation.
///
/// Comparisons return `1` when true and `0` otherwise. Returns `0` for
/// opcodes outside this group.
pub fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    match op {
        AluOp::Or => a | b,
        AluOp::And => a & b,
        AluOp::Xor => a ^ b,
        AluOp::Slt => u32::from((a as i32) < (b as i32)),
        AluOp::Sltu => u32::from(a < b),
        _ => 0,
    }
}
