//! RISC-V Application Binary Interface (ABI) register names.
//!
//! Defines the ABI register names, the indices the simulator and the
//! environment-call layer refer to by role, and the operand parser used
//! by the assembler.

use crate::common::constants::GPR_COUNT;

/// Register x0 (zero register, always zero).
pub const REG_ZERO: usize = 0;
/// Register x1 (return address, ra).
pub const REG_RA: usize = 1;
/// Register x2 (stack pointer, sp).
pub const REG_SP: usize = 2;
/// Register x3 (global pointer, gp).
pub const REG_GP: usize = 3;
/// Register x10 (first argument/return value, a0).
pub const REG_A0: usize = 10;
/// Register x17 (environment call number, a7).
pub const REG_A7: usize = 17;

/// ABI register names for x0–x31.
pub const REG_NAMES: [&str; GPR_COUNT] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Returns the ABI name for an integer register index.
#[inline]
pub fn reg_name(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("x??")
}

/// Parses a register operand.
///
/// Accepts ABI names (`a0`), the frame-pointer alias `fp`, and numeric
/// names (`x10`). A leading `$` is tolerated so operands copied from
/// trace output still assemble.
pub fn parse_register(token: &str) -> Option<usize> {
    let token = token.strip_prefix('$').unwrap_or(token);
    if token == "fp" {
        return Some(8);
    }
    if let Some(idx) = REG_NAMES.iter().position(|name| *name == token) {
        return Some(idx);
    }
    let digits = token.strip_prefix('x')?;
    if digits.is_empty() || (digits.len() > 1 && digits.starts_with('0')) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|idx| *idx < GPR_COUNT)
}
