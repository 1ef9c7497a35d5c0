//! Interactive debugger shell for RV32 assembly programs.
//!
//! This crate is the command layer between an operator and a simulated
//! machine. It provides:
//! 1. **Registry:** Named, aliased commands with a startup duplicate check.
//! 2. **Dispatcher:** The read-line, resolve, guard, invoke, re-prompt loop.
//! 3. **Session:** The loaded program, its source, and its file identity.
//! 4. **Rendering:** Fixed-width hex trace lines for register and memory changes.
//!
//! The simulator itself is consumed through the [`Machine`] trait; the
//! reference implementation is `rvdb_hardware::Simulator`.

/// The command set and its declarative table.
pub mod commands;
/// Trace line rendering.
pub mod diff;
/// Shell error types.
pub mod error;
/// The machine contract and its reference implementation.
pub mod machine;
/// Output sink.
pub mod output;
/// Command registry.
pub mod registry;
/// Session state.
pub mod session;
/// Input loop and dispatcher.
pub mod shell;

pub use crate::error::ShellError;
pub use crate::machine::{Machine, MachineBuilder};
pub use crate::output::Output;
pub use crate::registry::{CommandDescriptor, DuplicateCommandError, Registry};
pub use crate::session::Session;
pub use crate::shell::{Flow, Shell};
/// Machine configuration, re-exported for the binary and embedders.
pub use rvdb_hardware::MachineConfig;
