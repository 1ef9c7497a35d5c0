//! Simulator: an assembled program plus the architectural state executing it.
//!
//! Execution is a single-cycle interpreter: each `step` fetches the entry at
//! `pc`, executes it to completion, and records every register and memory
//! write in the change tracker.

use std::fmt;
use std::io::{self, Write};

use crate::asm::{self, Program, SourceRecord};
use crate::common::constants::WORD_BYTES;
use crate::common::{Reg, SimError};
use crate::config::MachineConfig;
use crate::core::arch::Gpr;
use crate::core::units::alu::Alu;
use crate::isa::abi::{REG_A0, REG_A7, REG_GP, REG_SP};
use crate::isa::{Instruction, LoadWidth};
use crate::sim::tracker::{ChangeRecord, ChangeTracker};
use crate::soc::Memory;

/// Environment call service numbers (`a7`).
mod service {
    pub const PRINT_INT: u32 = 1;
    pub const PRINT_STRING: u32 = 4;
    pub const EXIT: u32 = 10;
    pub const PRINT_CHAR: u32 = 11;
    pub const EXIT_WITH_CODE: u32 = 93;
}

/// Longest string `PRINT_STRING` will read before giving up on a terminator.
const MAX_PRINT_STRING: usize = 64 * 1024;

/// Outcome of a single `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction executed; the program can continue.
    Executed,
    /// One instruction executed and it ended the program.
    Exited(i32),
    /// Nothing executed: the program had already finished.
    Halted,
}

/// Top-level simulator: program, registers, memory, and change tracking.
pub struct Simulator {
    program: Program,
    regs: Gpr,
    pc: u32,
    memory: Memory,
    tracker: ChangeTracker,
    config: MachineConfig,
    exit_code: Option<i32>,
    retired: u64,
    console: Box<dyn Write>,
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("pc", &format_args!("{:#010x}", self.pc))
            .field("instructions", &self.program.entries().len())
            .field("exit_code", &self.exit_code)
            .field("retired", &self.retired)
            .finish_non_exhaustive()
    }
}

impl Simulator {
    /// Assembles `lines` and creates a simulator positioned at the first instruction.
    ///
    /// Console output from environment calls goes to stdout.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Assemble`] if any line fails to assemble.
    pub fn from_source(lines: &[String], config: &MachineConfig) -> Result<Self, SimError> {
        let program = asm::assemble(lines, config)?;
        Ok(Self::new(program, config.clone()))
    }

    /// Creates a simulator for an already assembled program.
    pub fn new(program: Program, config: MachineConfig) -> Self {
        let mut memory = Memory::new();
        memory.load_bytes(program.data_base(), program.data());

        let mut regs = Gpr::new();
        regs.write(REG_SP, config.stack_top);
        regs.write(REG_GP, config.global_pointer);

        Self {
            pc: program.text_base(),
            program,
            regs,
            memory,
            tracker: ChangeTracker::new(),
            config,
            exit_code: None,
            retired: 0,
            console: Box::new(io::stdout()),
        }
    }

    /// Replaces the console writer used by environment calls.
    #[must_use]
    pub fn with_console(mut self, console: impl Write + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    /// Current program counter.
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Reads any register, including `pc`.
    pub fn read(&self, reg: Reg) -> u32 {
        match reg {
            Reg::Gpr(idx) => self.regs.read(idx),
            Reg::Pc => self.pc,
        }
    }

    /// Reads a register by symbolic name.
    pub fn read_by_name(&self, name: &str) -> Option<u32> {
        Reg::from_name(name).map(|reg| self.read(reg))
    }

    /// Source information for the instruction at `addr`.
    pub fn source_at(&self, addr: u32) -> Option<&SourceRecord> {
        self.program.entry_at(addr).map(|entry| &entry.source)
    }

    /// The assembled program.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Main memory.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Registers changed by the most recent step, in first-write order.
    pub fn register_changes(&self) -> impl Iterator<Item = &ChangeRecord<Reg, u32>> {
        self.tracker.registers()
    }

    /// Memory bytes changed by the most recent step, in first-write order.
    pub fn memory_changes(&self) -> impl Iterator<Item = &ChangeRecord<u32, u8>> {
        self.tracker.memory()
    }

    /// Exit code, once the program has executed an exit call.
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Number of instructions executed since construction.
    pub const fn retired(&self) -> u64 {
        self.retired
    }

    /// Returns true once the program exited or ran off the end of its text.
    pub fn is_halted(&self) -> bool {
        self.exit_code.is_some() || self.program.entry_at(self.pc).is_none()
    }

    /// Executes one instruction.
    ///
    /// # Errors
    ///
    /// Returns a [`SimError`] for misaligned accesses or jumps, unsupported
    /// environment calls, and console write failures.
    pub fn step(&mut self) -> Result<StepOutcome, SimError> {
        self.tracker.clear();
        if self.exit_code.is_some() {
            return Ok(StepOutcome::Halted);
        }
        let Some(entry) = self.program.entry_at(self.pc) else {
            if self.pc % WORD_BYTES != 0 {
                return Err(SimError::MisalignedPc(self.pc));
            }
            return Ok(StepOutcome::Halted);
        };
        let inst = entry.instruction;
        tracing::debug!(pc = self.pc, %inst, "step");

        let next = self.execute(inst)?;
        self.set_pc(next);
        self.retired += 1;

        Ok(match self.exit_code {
            Some(code) => {
                tracing::info!(code, retired = self.retired, "program exited");
                StepOutcome::Exited(code)
            }
            None => StepOutcome::Executed,
        })
    }

    /// Steps until the program exits or runs off the end of its text.
    ///
    /// Returns the number of instructions executed by this call.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`step`](Self::step), and returns
    /// [`SimError::StepLimit`] when the configured limit is exceeded.
    pub fn run(&mut self) -> Result<u64, SimError> {
        let mut executed = 0u64;
        loop {
            if let Some(limit) = self.config.step_limit {
                if executed >= limit && !self.is_halted() {
                    return Err(SimError::StepLimit(limit));
                }
            }
            match self.step()? {
                StepOutcome::Executed => executed += 1,
                StepOutcome::Exited(_) => return Ok(executed + 1),
                StepOutcome::Halted => return Ok(executed),
            }
        }
    }

    fn execute(&mut self, inst: Instruction) -> Result<u32, SimError> {
        let pc = self.pc;
        let fallthrough = pc.wrapping_add(WORD_BYTES);

        match inst {
            Instruction::Lui { rd, imm } => self.write_reg(rd, imm << 12),
            Instruction::Auipc { rd, imm } => self.write_reg(rd, pc.wrapping_add(imm << 12)),
            Instruction::Jal { rd, target } => {
                let target = aligned_target(target)?;
                self.write_reg(rd, fallthrough);
                return Ok(target);
            }
            Instruction::Jalr { rd, rs1, offset } => {
                let target = self.gpr(rs1).wrapping_add_signed(offset) & !1;
                let target = aligned_target(target)?;
                self.write_reg(rd, fallthrough);
                return Ok(target);
            }
            Instruction::Branch {
                cond,
                rs1,
                rs2,
                target,
            } => {
                if cond.holds(self.gpr(rs1), self.gpr(rs2)) {
                    return aligned_target(target);
                }
            }
            Instruction::Load {
                width,
                rd,
                rs1,
                offset,
            } => {
                let addr = self.gpr(rs1).wrapping_add_signed(offset);
                check_alignment("load", addr, width.bytes())?;
                let value = match width {
                    LoadWidth::Byte => i32::from(self.memory.read_u8(addr) as i8) as u32,
                    LoadWidth::ByteUnsigned => u32::from(self.memory.read_u8(addr)),
                    LoadWidth::Half => i32::from(self.memory.read_u16(addr) as i16) as u32,
                    LoadWidth::HalfUnsigned => u32::from(self.memory.read_u16(addr)),
                    LoadWidth::Word => self.memory.read_u32(addr),
                };
                self.write_reg(rd, value);
            }
            Instruction::Store {
                width,
                rs1,
                rs2,
                offset,
            } => {
                let addr = self.gpr(rs1).wrapping_add_signed(offset);
                check_alignment("store", addr, width.bytes())?;
                let bytes = self.gpr(rs2).to_le_bytes();
                for (i, byte) in (0u32..).zip(&bytes[..width.bytes() as usize]) {
                    self.write_mem(addr.wrapping_add(i), *byte);
                }
            }
            Instruction::OpImm { op, rd, rs1, imm } => {
                let value = Alu::execute(op, self.gpr(rs1), imm as u32);
                self.write_reg(rd, value);
            }
            Instruction::Op { op, rd, rs1, rs2 } => {
                let value = Alu::execute(op, self.gpr(rs1), self.gpr(rs2));
                self.write_reg(rd, value);
            }
            Instruction::Ecall => self.environment_call()?,
        }
        Ok(fallthrough)
    }

    fn environment_call(&mut self) -> Result<(), SimError> {
        let a0 = self.regs.read(REG_A0);
        match self.regs.read(REG_A7) {
            service::PRINT_INT => self.print(format!("{}", a0 as i32).as_bytes())?,
            service::PRINT_STRING => {
                let bytes = self.memory.read_c_string(a0, MAX_PRINT_STRING);
                self.print(&bytes)?;
            }
            service::PRINT_CHAR => self.print(&[a0 as u8])?,
            service::EXIT => self.exit_code = Some(0),
            service::EXIT_WITH_CODE => self.exit_code = Some(a0 as i32),
            other => return Err(SimError::UnsupportedCall(other)),
        }
        Ok(())
    }

    fn print(&mut self, bytes: &[u8]) -> Result<(), SimError> {
        self.console
            .write_all(bytes)
            .and_then(|()| self.console.flush())
            .map_err(|e| SimError::Console(e.to_string()))
    }

    fn gpr(&self, idx: usize) -> u32 {
        self.regs.read(idx)
    }

    fn write_reg(&mut self, idx: usize, value: u32) {
        let previous = self.regs.read(idx);
        self.regs.write(idx, value);
        let current = self.regs.read(idx);
        self.tracker.record_register(Reg::Gpr(idx), previous, current);
    }

    fn write_mem(&mut self, addr: u32, value: u8) {
        let previous = self.memory.read_u8(addr);
        self.memory.write_u8(addr, value);
        self.tracker.record_memory(addr, previous, value);
    }

    fn set_pc(&mut self, next: u32) {
        let previous = self.pc;
        self.pc = next;
        self.tracker.record_register(Reg::Pc, previous, next);
    }
}

fn aligned_target(target: u32) -> Result<u32, SimError> {
    if target % WORD_BYTES == 0 {
        Ok(target)
    } else {
        Err(SimError::MisalignedPc(target))
    }
}

fn check_alignment(access: &'static str, addr: u32, size: u32) -> Result<(), SimError> {
    if addr % size == 0 {
        Ok(())
    } else {
        Err(SimError::MisalignedAccess { access, addr })
    }
}
