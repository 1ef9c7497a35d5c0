//! Assembly and execution error definitions.
//!
//! This module defines the failure modes of the simulator. It provides:
//! 1. **Assembly Errors:** Problems found while turning source lines into a program.
//! 2. **Execution Errors:** Faults raised while stepping an assembled program.
//!
//! Both integrate with the standard error traits through `thiserror`, so callers
//! can propagate them with `?` and print the full source chain.

use thiserror::Error;

/// Error produced while parsing or resolving a single source line.
///
/// Always wrapped in [`SimError::Assemble`], which adds the line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmError {
    /// The mnemonic is neither a real instruction nor a known pseudo-instruction.
    #[error("unknown instruction `{0}`")]
    UnknownMnemonic(String),

    /// The directive (a token starting with `.`) is not supported.
    #[error("unknown directive `{0}`")]
    UnknownDirective(String),

    /// The operand does not name an integer register.
    #[error("unknown register `{0}`")]
    UnknownRegister(String),

    /// The operand is not a parseable integer literal.
    #[error("invalid immediate `{0}`")]
    InvalidImmediate(String),

    /// The immediate parsed but does not fit the instruction's field.
    #[error("immediate {value} out of range for `{mnemonic}`")]
    ImmediateOutOfRange {
        /// Instruction mnemonic whose field overflowed.
        mnemonic: String,
        /// The offending value.
        value: i64,
    },

    /// The instruction was given the wrong number of operands.
    #[error("`{mnemonic}` expects {expected} operand(s), found {found}")]
    OperandCount {
        /// Instruction mnemonic.
        mnemonic: String,
        /// Number of operands the instruction takes.
        expected: usize,
        /// Number of operands on the line.
        found: usize,
    },

    /// A load/store operand is not of the form `offset(register)`.
    #[error("malformed memory operand `{0}`")]
    MemoryOperand(String),

    /// A string literal is missing its quotes or has a bad escape.
    #[error("malformed string literal `{0}`")]
    StringLiteral(String),

    /// A label is referenced but never defined.
    #[error("undefined label `{0}`")]
    UndefinedLabel(String),

    /// A label is defined more than once.
    #[error("duplicate label `{0}`")]
    DuplicateLabel(String),

    /// A data directive would extend the data segment past the top of memory.
    #[error("`{directive}` of {requested} byte(s) runs past the end of the address space")]
    SegmentOverflow {
        /// The directive that asked for the bytes.
        directive: String,
        /// Number of bytes it asked for.
        requested: u64,
    },

    /// An instruction appears outside the `.text` section.
    #[error("instruction `{0}` outside of .text")]
    InstructionInData(String),
}

/// Simulator error type.
///
/// Covers both program construction (assembly) and execution faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A source line failed to assemble. `line` is 1-based.
    #[error("line {line}: {source}")]
    Assemble {
        /// 1-based line number in the source.
        line: usize,
        /// What went wrong on that line.
        #[source]
        source: AsmError,
    },

    /// A load or store touched an address not aligned to its access size.
    #[error("misaligned {access} access at {addr:#010x}")]
    MisalignedAccess {
        /// Kind of access (`load` or `store`).
        access: &'static str,
        /// Faulting address.
        addr: u32,
    },

    /// A jump or branch produced a program counter that is not word aligned.
    #[error("misaligned instruction address {0:#010x}")]
    MisalignedPc(u32),

    /// `ecall` was executed with an unsupported service number in `a7`.
    #[error("unsupported environment call {0}")]
    UnsupportedCall(u32),

    /// Console output from an environment call could not be written.
    #[error("console write failed: {0}")]
    Console(String),

    /// `run` executed more instructions than the configured limit.
    #[error("step limit of {0} instructions exceeded")]
    StepLimit(u64),
}

impl SimError {
    /// Wraps an [`AsmError`] with its 1-based source line number.
    pub fn at_line(line: usize, source: AsmError) -> Self {
        Self::Assemble { line, source }
    }
}
