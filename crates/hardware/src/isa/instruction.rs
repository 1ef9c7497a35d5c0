//! Decoded instruction representation.
//!
//! The assembler produces `Instruction` values directly; there is no binary
//! encoding step. Jump and branch targets are stored as absolute addresses,
//! already resolved from labels.
//!
//! The `Display` implementation is the canonical text form of an instruction
//! and is what source lookups report, e.g. `addi a0, zero, 10` or
//! `lw t0, 4(sp)`.

use std::fmt;

use crate::common::constants::{HALF_BYTES, WORD_BYTES};
use crate::isa::abi::reg_name;

/// Integer ALU operation shared by register-register and register-immediate forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// Addition.
    Add,
    /// Subtraction (register form only).
    Sub,
    /// Shift left logical.
    Sll,
    /// Set if less than (signed).
    Slt,
    /// Set if less than (unsigned).
    Sltu,
    /// Bitwise exclusive or.
    Xor,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Bitwise or.
    Or,
    /// Bitwise and.
    And,
    /// Multiply, low word.
    Mul,
    /// Multiply signed × signed, high word.
    Mulh,
    /// Multiply unsigned × unsigned, high word.
    Mulhu,
    /// Signed division.
    Div,
    /// Unsigned division.
    Divu,
    /// Signed remainder.
    Rem,
    /// Unsigned remainder.
    Remu,
}

impl AluOp {
    /// Register-register mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Sll => "sll",
            Self::Slt => "slt",
            Self::Sltu => "sltu",
            Self::Xor => "xor",
            Self::Srl => "srl",
            Self::Sra => "sra",
            Self::Or => "or",
            Self::And => "and",
            Self::Mul => "mul",
            Self::Mulh => "mulh",
            Self::Mulhu => "mulhu",
            Self::Div => "div",
            Self::Divu => "divu",
            Self::Rem => "rem",
            Self::Remu => "remu",
        }
    }

    /// Register-immediate mnemonic, if the operation has an immediate form.
    pub const fn imm_mnemonic(self) -> Option<&'static str> {
        match self {
            Self::Add => Some("addi"),
            Self::Sll => Some("slli"),
            Self::Slt => Some("slti"),
            Self::Sltu => Some("sltiu"),
            Self::Xor => Some("xori"),
            Self::Srl => Some("srli"),
            Self::Sra => Some("srai"),
            Self::Or => Some("ori"),
            Self::And => Some("andi"),
            _ => None,
        }
    }

    /// Returns true for shifts, whose immediate is a 5-bit shift amount.
    pub const fn is_shift(self) -> bool {
        matches!(self, Self::Sll | Self::Srl | Self::Sra)
    }
}

/// Condition tested by a conditional branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchCond {
    /// Branch if equal.
    Eq,
    /// Branch if not equal.
    Ne,
    /// Branch if less than (signed).
    Lt,
    /// Branch if greater or equal (signed).
    Ge,
    /// Branch if less than (unsigned).
    Ltu,
    /// Branch if greater or equal (unsigned).
    Geu,
}

impl BranchCond {
    /// Branch mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Eq => "beq",
            Self::Ne => "bne",
            Self::Lt => "blt",
            Self::Ge => "bge",
            Self::Ltu => "bltu",
            Self::Geu => "bgeu",
        }
    }

    /// Evaluates the condition on two register values.
    pub const fn holds(self, a: u32, b: u32) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => (a as i32) < (b as i32),
            Self::Ge => (a as i32) >= (b as i32),
            Self::Ltu => a < b,
            Self::Geu => a >= b,
        }
    }
}

/// Width and extension of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadWidth {
    /// Sign-extended byte (`lb`).
    Byte,
    /// Sign-extended half word (`lh`).
    Half,
    /// Full word (`lw`).
    Word,
    /// Zero-extended byte (`lbu`).
    ByteUnsigned,
    /// Zero-extended half word (`lhu`).
    HalfUnsigned,
}

impl LoadWidth {
    /// Load mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Byte => "lb",
            Self::Half => "lh",
            Self::Word => "lw",
            Self::ByteUnsigned => "lbu",
            Self::HalfUnsigned => "lhu",
        }
    }

    /// Access size in bytes.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte | Self::ByteUnsigned => 1,
            Self::Half | Self::HalfUnsigned => HALF_BYTES,
            Self::Word => WORD_BYTES,
        }
    }
}

/// Width of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreWidth {
    /// `sb`.
    Byte,
    /// `sh`.
    Half,
    /// `sw`.
    Word,
}

impl StoreWidth {
    /// Store mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Byte => "sb",
            Self::Half => "sh",
            Self::Word => "sw",
        }
    }

    /// Access size in bytes.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Half => HALF_BYTES,
            Self::Word => WORD_BYTES,
        }
    }
}

/// A single real (non-pseudo) instruction with resolved operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `rd = imm << 12`.
    Lui {
        /// Destination register.
        rd: usize,
        /// 20-bit upper immediate.
        imm: u32,
    },
    /// `rd = pc + (imm << 12)`.
    Auipc {
        /// Destination register.
        rd: usize,
        /// 20-bit upper immediate.
        imm: u32,
    },
    /// Jump and link to an absolute target.
    Jal {
        /// Link register.
        rd: usize,
        /// Absolute jump target.
        target: u32,
    },
    /// Jump and link to `rs1 + offset`.
    Jalr {
        /// Link register.
        rd: usize,
        /// Base register.
        rs1: usize,
        /// Signed 12-bit offset.
        offset: i32,
    },
    /// Conditional branch to an absolute target.
    Branch {
        /// Condition to test.
        cond: BranchCond,
        /// First compared register.
        rs1: usize,
        /// Second compared register.
        rs2: usize,
        /// Absolute branch target.
        target: u32,
    },
    /// Memory load.
    Load {
        /// Access width.
        width: LoadWidth,
        /// Destination register.
        rd: usize,
        /// Base register.
        rs1: usize,
        /// Signed 12-bit offset.
        offset: i32,
    },
    /// Memory store.
    Store {
        /// Access width.
        width: StoreWidth,
        /// Base register.
        rs1: usize,
        /// Source register.
        rs2: usize,
        /// Signed 12-bit offset.
        offset: i32,
    },
    /// Register-immediate ALU operation.
    OpImm {
        /// Operation.
        op: AluOp,
        /// Destination register.
        rd: usize,
        /// Source register.
        rs1: usize,
        /// Signed 12-bit immediate, or shift amount for shifts.
        imm: i32,
    },
    /// Register-register ALU operation.
    Op {
        /// Operation.
        op: AluOp,
        /// Destination register.
        rd: usize,
        /// First source register.
        rs1: usize,
        /// Second source register.
        rs2: usize,
    },
    /// Environment call.
    Ecall,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Lui { rd, imm } => write!(f, "lui {}, {:#x}", reg_name(rd), imm),
            Self::Auipc { rd, imm } => write!(f, "auipc {}, {:#x}", reg_name(rd), imm),
            Self::Jal { rd, target } => write!(f, "jal {}, {:#010x}", reg_name(rd), target),
            Self::Jalr { rd, rs1, offset } => {
                write!(f, "jalr {}, {}({})", reg_name(rd), offset, reg_name(rs1))
            }
            Self::Branch {
                cond,
                rs1,
                rs2,
                target,
            } => write!(
                f,
                "{} {}, {}, {:#010x}",
                cond.mnemonic(),
                reg_name(rs1),
                reg_name(rs2),
                target
            ),
            Self::Load {
                width,
                rd,
                rs1,
                offset,
            } => write!(
                f,
                "{} {}, {}({})",
                width.mnemonic(),
                reg_name(rd),
                offset,
                reg_name(rs1)
            ),
            Self::Store {
                width,
                rs1,
                rs2,
                offset,
            } => write!(
                f,
                "{} {}, {}({})",
                width.mnemonic(),
                reg_name(rs2),
                offset,
                reg_name(rs1)
            ),
            Self::OpImm { op, rd, rs1, imm } => write!(
                f,
                "{} {}, {}, {}",
                op.imm_mnemonic().unwrap_or("op-imm"),
                reg_name(rd),
                reg_name(rs1),
                imm
            ),
            Self::Op { op, rd, rs1, rs2 } => write!(
                f,
                "{} {}, {}, {}",
                op.mnemonic(),
                reg_name(rd),
                reg_name(rs1),
                reg_name(rs2)
            ),
            Self::Ecall => f.write_str("ecall"),
        }
    }
}
