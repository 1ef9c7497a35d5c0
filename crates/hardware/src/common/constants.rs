//! Common constants used throughout the simulator.
//!
//! Sizes are in bytes unless the name says otherwise.

/// Size of a machine word (and of every instruction) in bytes.
pub const WORD_BYTES: u32 = 4;

/// Size of a half word in bytes.
pub const HALF_BYTES: u32 = 2;

/// Size of the 32-bit address space in bytes.
pub const ADDRESS_SPACE: u64 = 1 << 32;

/// Number of integer registers in the register file.
pub const GPR_COUNT: usize = 32;

/// Smallest value representable in a 12-bit signed immediate.
pub const IMM12_MIN: i64 = -2048;

/// Largest value representable in a 12-bit signed immediate.
pub const IMM12_MAX: i64 = 2047;

/// Largest value of a 20-bit upper immediate (`lui`/`auipc`).
pub const IMM20_MAX: i64 = 0xF_FFFF;

/// Mask selecting the shift amount of an RV32 shift.
pub const SHAMT_MASK: u32 = 0x1F;
