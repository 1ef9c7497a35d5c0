//! Architectural register identifiers.
//!
//! This module provides the `Reg` type naming every register the simulator exposes.
//! It provides:
//! 1. **Identity:** A single type for both integer registers and the program counter.
//! 2. **Naming:** ABI symbolic names (`zero`, `ra`, `sp`, ..., `pc`).
//! 3. **Enumeration:** The canonical display order used by register dumps.

use std::fmt;

use super::constants::GPR_COUNT;
use crate::isa::abi;

/// A register visible to the debugger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reg {
    /// Integer register `x0`..`x31`.
    Gpr(usize),
    /// The program counter.
    Pc,
}

impl Reg {
    /// Returns every register in canonical display order: `x0`..`x31`, then `pc`.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..GPR_COUNT).map(Self::Gpr).chain(std::iter::once(Self::Pc))
    }

    /// Returns the symbolic name of the register (`"sp"`, `"pc"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Gpr(idx) => abi::reg_name(idx),
            Self::Pc => "pc",
        }
    }

    /// Looks up a register by symbolic name, `xN` name, or `pc`.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "pc" {
            return Some(Self::Pc);
        }
        abi::parse_register(name).map(Self::Gpr)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
