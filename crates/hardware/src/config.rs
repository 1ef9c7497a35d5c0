//! Configuration for the reference machine.
//!
//! This module defines the memory map and execution limits used when a
//! program is assembled and run. It provides:
//! 1. **Defaults:** A conventional RV32 layout (text, data, stack, global pointer).
//! 2. **Structure:** `MachineConfig`, deserializable with per-field defaults.
//!
//! The shell fills this in from command-line flags; tests and embedders may
//! deserialize it from JSON or use `MachineConfig::default()`.

use serde::Deserialize;

/// Default configuration constants for the machine.
mod defaults {
    /// Address of the first instruction of the `.text` section.
    pub const TEXT_BASE: u32 = 0x0040_0000;

    /// Address of the first byte of the `.data` section.
    pub const DATA_BASE: u32 = 0x1001_0000;

    /// Initial stack pointer (`sp`).
    pub const STACK_TOP: u32 = 0x7FFF_EFFC;

    /// Initial global pointer (`gp`).
    pub const GLOBAL_POINTER: u32 = 0x1000_8000;
}

/// Memory layout and execution limits of the simulated machine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MachineConfig {
    /// Address of the first instruction.
    #[serde(default = "MachineConfig::default_text_base")]
    pub text_base: u32,

    /// Address of the first data byte.
    #[serde(default = "MachineConfig::default_data_base")]
    pub data_base: u32,

    /// Initial value of `sp`.
    #[serde(default = "MachineConfig::default_stack_top")]
    pub stack_top: u32,

    /// Initial value of `gp`.
    #[serde(default = "MachineConfig::default_global_pointer")]
    pub global_pointer: u32,

    /// Maximum number of instructions a single `run` may execute.
    /// `None` runs until the program exits.
    #[serde(default)]
    pub step_limit: Option<u64>,
}

impl MachineConfig {
    fn default_text_base() -> u32 {
        defaults::TEXT_BASE
    }

    fn default_data_base() -> u32 {
        defaults::DATA_BASE
    }

    fn default_stack_top() -> u32 {
        defaults::STACK_TOP
    }

    fn default_global_pointer() -> u32 {
        defaults::GLOBAL_POINTER
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            text_base: defaults::TEXT_BASE,
            data_base: defaults::DATA_BASE,
            stack_top: defaults::STACK_TOP,
            global_pointer: defaults::GLOBAL_POINTER,
            step_limit: None,
        }
    }
}
