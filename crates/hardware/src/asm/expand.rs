//! Instruction selection and pseudo-instruction expansion.
//!
//! Turns a lexed statement into one or more real [`Instruction`]s. The
//! layout pass calls [`size`] before labels are known; the emit pass calls
//! [`expand`] once every label has an address. Both must agree on the
//! number of instructions a statement produces.

use std::collections::HashMap;

use crate::common::AsmError;
use crate::common::constants::{IMM12_MAX, IMM12_MIN, IMM20_MAX, SHAMT_MASK};
use crate::isa::abi::{REG_RA, REG_ZERO, parse_register};
use crate::isa::{AluOp, BranchCond, Instruction, LoadWidth, StoreWidth};

use super::lexer::{Statement, parse_int};

/// Label name to address map.
pub type Labels = HashMap<String, u32>;

/// Pseudo-instructions that always expand to a single real instruction.
const SINGLE_PSEUDOS: &[&str] = &[
    "nop", "mv", "not", "neg", "seqz", "snez", "j", "jr", "ret", "call", "beqz", "bnez", "blez",
    "bgez", "bltz", "bgtz", "bgt", "ble", "bgtu", "bleu",
];

/// Real instruction mnemonics.
const REAL: &[&str] = &[
    "lui", "auipc", "jal", "jalr", "beq", "bne", "blt", "bge", "bltu", "bgeu", "lb", "lh", "lw",
    "lbu", "lhu", "sb", "sh", "sw", "addi", "slti", "sltiu", "xori", "ori", "andi", "slli", "srli",
    "srai", "add", "sub", "sll", "slt", "sltu", "xor", "srl", "sra", "or", "and", "mul", "mulh",
    "mulhu", "div", "divu", "rem", "remu", "ecall",
];

/// Instructions produced by one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Real instructions, in execution order.
    pub instructions: Vec<Instruction>,
    /// True when the statement was a pseudo-instruction.
    pub pseudo: bool,
}

/// Returns the number of instructions `stmt` assembles to.
pub fn size(stmt: &Statement) -> Result<usize, AsmError> {
    match stmt.head.as_str() {
        "li" => {
            arity(stmt, 2)?;
            Ok(if fits_imm12(li_value(stmt, &stmt.operands[1])?) {
                1
            } else {
                2
            })
        }
        "la" => Ok(2),
        m if REAL.contains(&m) || SINGLE_PSEUDOS.contains(&m) => Ok(1),
        m => Err(AsmError::UnknownMnemonic(m.to_string())),
    }
}

/// Expands `stmt` into real instructions, resolving label operands.
pub fn expand(stmt: &Statement, labels: &Labels) -> Result<Expansion, AsmError> {
    let ops = &stmt.operands;
    let real = |inst: Instruction| -> Result<Expansion, AsmError> {
        Ok(Expansion {
            instructions: vec![inst],
            pseudo: false,
        })
    };
    let pseudo = |instructions: Vec<Instruction>| -> Result<Expansion, AsmError> {
        Ok(Expansion {
            instructions,
            pseudo: true,
        })
    };

    match stmt.head.as_str() {
        "lui" | "auipc" => {
            arity(stmt, 2)?;
            let rd = reg(&ops[0])?;
            let imm = upper20(stmt, &ops[1])?;
            real(if stmt.head == "lui" {
                Instruction::Lui { rd, imm }
            } else {
                Instruction::Auipc { rd, imm }
            })
        }
        "jal" if ops.len() == 1 => pseudo(vec![Instruction::Jal {
            rd: REG_RA,
            target: target(&ops[0], labels)?,
        }]),
        "jal" => {
            arity(stmt, 2)?;
            real(Instruction::Jal {
                rd: reg(&ops[0])?,
                target: target(&ops[1], labels)?,
            })
        }
        "jalr" if ops.len() == 1 => pseudo(vec![Instruction::Jalr {
            rd: REG_RA,
            rs1: reg(&ops[0])?,
            offset: 0,
        }]),
        "jalr" if ops.len() == 2 => {
            let (offset, rs1) = memory_operand(stmt, &ops[1])?;
            real(Instruction::Jalr {
                rd: reg(&ops[0])?,
                rs1,
                offset,
            })
        }
        "jalr" => {
            arity(stmt, 3)?;
            real(Instruction::Jalr {
                rd: reg(&ops[0])?,
                rs1: reg(&ops[1])?,
                offset: imm12(stmt, &ops[2])?,
            })
        }
        m @ ("beq" | "bne" | "blt" | "bge" | "bltu" | "bgeu") => {
            arity(stmt, 3)?;
            real(Instruction::Branch {
                cond: branch_cond(m),
                rs1: reg(&ops[0])?,
                rs2: reg(&ops[1])?,
                target: target(&ops[2], labels)?,
            })
        }
        m @ ("lb" | "lh" | "lw" | "lbu" | "lhu") => {
            arity(stmt, 2)?;
            let (offset, rs1) = memory_operand(stmt, &ops[1])?;
            real(Instruction::Load {
                width: load_width(m),
                rd: reg(&ops[0])?,
                rs1,
                offset,
            })
        }
        m @ ("sb" | "sh" | "sw") => {
            arity(stmt, 2)?;
            let (offset, rs1) = memory_operand(stmt, &ops[1])?;
            real(Instruction::Store {
                width: store_width(m),
                rs1,
                rs2: reg(&ops[0])?,
                offset,
            })
        }
        m @ ("addi" | "slti" | "sltiu" | "xori" | "ori" | "andi" | "slli" | "srli" | "srai") => {
            arity(stmt, 3)?;
            let op = imm_op(m);
            let imm = if op.is_shift() {
                shamt(stmt, &ops[2])?
            } else {
                imm12(stmt, &ops[2])?
            };
            real(Instruction::OpImm {
                op,
                rd: reg(&ops[0])?,
                rs1: reg(&ops[1])?,
                imm,
            })
        }
        m @ ("add" | "sub" | "sll" | "slt" | "sltu" | "xor" | "srl" | "sra" | "or" | "and"
        | "mul" | "mulh" | "mulhu" | "div" | "divu" | "rem" | "remu") => {
            arity(stmt, 3)?;
            real(Instruction::Op {
                op: reg_op(m),
                rd: reg(&ops[0])?,
                rs1: reg(&ops[1])?,
                rs2: reg(&ops[2])?,
            })
        }
        "ecall" => {
            arity(stmt, 0)?;
            real(Instruction::Ecall)
        }

        "nop" => {
            arity(stmt, 0)?;
            pseudo(vec![addi(REG_ZERO, REG_ZERO, 0)])
        }
        "li" => {
            arity(stmt, 2)?;
            let rd = reg(&ops[0])?;
            pseudo(load_constant(rd, li_value(stmt, &ops[1])?, false))
        }
        "la" => {
            arity(stmt, 2)?;
            let rd = reg(&ops[0])?;
            let addr = target(&ops[1], labels)?;
            pseudo(load_constant(rd, i64::from(addr), true))
        }
        "mv" => {
            arity(stmt, 2)?;
            pseudo(vec![addi(reg(&ops[0])?, reg(&ops[1])?, 0)])
        }
        "not" => {
            arity(stmt, 2)?;
            pseudo(vec![Instruction::OpImm {
                op: AluOp::Xor,
                rd: reg(&ops[0])?,
                rs1: reg(&ops[1])?,
                imm: -1,
            }])
        }
        "neg" => {
            arity(stmt, 2)?;
            pseudo(vec![Instruction::Op {
                op: AluOp::Sub,
                rd: reg(&ops[0])?,
                rs1: REG_ZERO,
                rs2: reg(&ops[1])?,
            }])
        }
        "seqz" => {
            arity(stmt, 2)?;
            pseudo(vec![Instruction::OpImm {
                op: AluOp::Sltu,
                rd: reg(&ops[0])?,
                rs1: reg(&ops[1])?,
                imm: 1,
            }])
        }
        "snez" => {
            arity(stmt, 2)?;
            pseudo(vec![Instruction::Op {
                op: AluOp::Sltu,
                rd: reg(&ops[0])?,
                rs1: REG_ZERO,
                rs2: reg(&ops[1])?,
            }])
        }
        "j" => {
            arity(stmt, 1)?;
            pseudo(vec![Instruction::Jal {
                rd: REG_ZERO,
                target: target(&ops[0], labels)?,
            }])
        }
        "call" => {
            arity(stmt, 1)?;
            pseudo(vec![Instruction::Jal {
                rd: REG_RA,
                target: target(&ops[0], labels)?,
            }])
        }
        "jr" => {
            arity(stmt, 1)?;
            pseudo(vec![Instruction::Jalr {
                rd: REG_ZERO,
                rs1: reg(&ops[0])?,
                offset: 0,
            }])
        }
        "ret" => {
            arity(stmt, 0)?;
            pseudo(vec![Instruction::Jalr {
                rd: REG_ZERO,
                rs1: REG_RA,
                offset: 0,
            }])
        }
        m @ ("beqz" | "bnez" | "blez" | "bgez" | "bltz" | "bgtz") => {
            arity(stmt, 2)?;
            let rs = reg(&ops[0])?;
            let target = target(&ops[1], labels)?;
            let (cond, rs1, rs2) = match m {
                "beqz" => (BranchCond::Eq, rs, REG_ZERO),
                "bnez" => (BranchCond::Ne, rs, REG_ZERO),
                "blez" => (BranchCond::Ge, REG_ZERO, rs),
                "bgez" => (BranchCond::Ge, rs, REG_ZERO),
                "bltz" => (BranchCond::Lt, rs, REG_ZERO),
                _ => (BranchCond::Lt, REG_ZERO, rs),
            };
            pseudo(vec![Instruction::Branch {
                cond,
                rs1,
                rs2,
                target,
            }])
        }
        m @ ("bgt" | "ble" | "bgtu" | "bleu") => {
            arity(stmt, 3)?;
            let cond = match m {
                "bgt" => BranchCond::Lt,
                "ble" => BranchCond::Ge,
                "bgtu" => BranchCond::Ltu,
                _ => BranchCond::Geu,
            };
            // Swapped operands: `bgt a, b` is `blt b, a`.
            pseudo(vec![Instruction::Branch {
                cond,
                rs1: reg(&ops[1])?,
                rs2: reg(&ops[0])?,
                target: target(&ops[2], labels)?,
            }])
        }
        m => Err(AsmError::UnknownMnemonic(m.to_string())),
    }
}

/// Splits a 32-bit value into a `lui` upper part and a sign-extended low 12 bits.
pub fn split_hi_lo(value: u32) -> (u32, i32) {
    let lo = ((value & 0xFFF) as i32) << 20 >> 20;
    let hi = (value.wrapping_sub(lo as u32) >> 12) & 0xF_FFFF;
    (hi, lo)
}

fn load_constant(rd: usize, value: i64, force_pair: bool) -> Vec<Instruction> {
    if !force_pair && fits_imm12(value) {
        return vec![addi(rd, REG_ZERO, value as i32)];
    }
    let (hi, lo) = split_hi_lo(value as u32);
    vec![Instruction::Lui { rd, imm: hi }, addi(rd, rd, lo)]
}

const fn addi(rd: usize, rs1: usize, imm: i32) -> Instruction {
    Instruction::OpImm {
        op: AluOp::Add,
        rd,
        rs1,
        imm,
    }
}

fn fits_imm12(value: i64) -> bool {
    (IMM12_MIN..=IMM12_MAX).contains(&value)
}

fn arity(stmt: &Statement, expected: usize) -> Result<(), AsmError> {
    if stmt.operands.len() == expected {
        Ok(())
    } else {
        Err(AsmError::OperandCount {
            mnemonic: stmt.head.clone(),
            expected,
            found: stmt.operands.len(),
        })
    }
}

fn reg(token: &str) -> Result<usize, AsmError> {
    parse_register(token).ok_or_else(|| AsmError::UnknownRegister(token.to_string()))
}

fn out_of_range(stmt: &Statement, value: i64) -> AsmError {
    AsmError::ImmediateOutOfRange {
        mnemonic: stmt.head.clone(),
        value,
    }
}

fn imm12(stmt: &Statement, token: &str) -> Result<i32, AsmError> {
    let value = parse_int(token)?;
    if fits_imm12(value) {
        Ok(value as i32)
    } else {
        Err(out_of_range(stmt, value))
    }
}

fn shamt(stmt: &Statement, token: &str) -> Result<i32, AsmError> {
    let value = parse_int(token)?;
    if (0..=i64::from(SHAMT_MASK)).contains(&value) {
        Ok(value as i32)
    } else {
        Err(out_of_range(stmt, value))
    }
}

fn upper20(stmt: &Statement, token: &str) -> Result<u32, AsmError> {
    let value = parse_int(token)?;
    if (0..=IMM20_MAX).contains(&value) {
        Ok(value as u32)
    } else {
        Err(out_of_range(stmt, value))
    }
}

/// Parses the `li` constant; accepts anything representable as a signed or unsigned word.
fn li_value(stmt: &Statement, token: &str) -> Result<i64, AsmError> {
    let value = parse_int(token)?;
    if (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(&value) {
        Ok(value)
    } else {
        Err(out_of_range(stmt, value))
    }
}

/// Resolves a jump/branch/`la` target: a label, or a literal absolute address.
fn target(token: &str, labels: &Labels) -> Result<u32, AsmError> {
    if let Some(addr) = labels.get(token) {
        return Ok(*addr);
    }
    match parse_int(token) {
        Ok(value) if (0..=i64::from(u32::MAX)).contains(&value) => Ok(value as u32),
        _ => Err(AsmError::UndefinedLabel(token.to_string())),
    }
}

/// Parses `offset(reg)` or `(reg)`.
fn memory_operand(stmt: &Statement, token: &str) -> Result<(i32, usize), AsmError> {
    let malformed = || AsmError::MemoryOperand(token.to_string());
    let (offset, rest) = token.split_once('(').ok_or_else(malformed)?;
    let base = rest.strip_suffix(')').ok_or_else(malformed)?;
    let offset = if offset.is_empty() {
        0
    } else {
        imm12(stmt, offset)?
    };
    Ok((offset, reg(base)?))
}

fn branch_cond(m: &str) -> BranchCond {
    match m {
        "beq" => BranchCond::Eq,
        "bne" => BranchCond::Ne,
        "blt" => BranchCond::Lt,
        "bge" => BranchCond::Ge,
        "bltu" => BranchCond::Ltu,
        _ => BranchCond::Geu,
    }
}

fn load_width(m: &str) -> LoadWidth {
    match m {
        "lb" => LoadWidth::Byte,
        "lh" => LoadWidth::Half,
        "lbu" => LoadWidth::ByteUnsigned,
        "lhu" => LoadWidth::HalfUnsigned,
        _ => LoadWidth::Word,
    }
}

fn store_width(m: &str) -> StoreWidth {
    match m {
        "sb" => StoreWidth::Byte,
        "sh" => StoreWidth::Half,
        _ => StoreWidth::Word,
    }
}

fn imm_op(m: &str) -> AluOp {
    match m {
        "slti" => AluOp::Slt,
        "sltiu" => AluOp::Sltu,
        "xori" => AluOp::Xor,
        "ori" => AluOp::Or,
        "andi" => AluOp::And,
        "slli" => AluOp::Sll,
        "srli" => AluOp::Srl,
        "srai" => AluOp::Sra,
        _ => AluOp::Add,
    }
}

fn reg_op(m: &str) -> AluOp {
    match m {
        "sub" => AluOp::Sub,
        "sll" => AluOp::Sll,
        "slt" => AluOp::Slt,
        "sltu" => AluOp::Sltu,
        "xor" => AluOp::Xor,
        "srl" => AluOp::Srl,
        "sra" => AluOp::Sra,
        "or" => AluOp::Or,
        "and" => AluOp::And,
        "mul" => AluOp::Mul,
        "mulh" => AluOp::Mulh,
        "mulhu" => AluOp::Mulhu,
        "div" => AluOp::Div,
        "divu" => AluOp::Divu,
        "rem" => AluOp::Rem,
        "remu" => AluOp::Remu,
        _ => AluOp::Add,
    }
}
