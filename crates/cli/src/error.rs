//! Shell error definitions.
//!
//! Recoverable operator mistakes (unknown commands, commands that need a
//! loaded program) never become errors; they are answered with a guidance
//! line. Everything here is unrecoverable and propagates to the binary's
//! top level, which reports it and exits.

use std::io;

use rvdb_hardware::SimError;
use thiserror::Error;

use crate::registry::DuplicateCommandError;

/// Errors that end the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The command table claims a name twice.
    #[error(transparent)]
    Registry(#[from] DuplicateCommandError),

    /// A program file could not be read.
    #[error("could not read file '{path}'")]
    Read {
        /// Path as given by the operator.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The simulator rejected the program or faulted while executing it.
    #[error("simulator error")]
    Simulator(#[from] SimError),

    /// Operator input could not be read.
    #[error("failed to read input")]
    Input(#[source] io::Error),

    /// Output could not be written.
    #[error("failed to write output")]
    Output(#[source] io::Error),

    /// The machine listed a register it then could not read.
    #[error("register `{0}` is listed by the machine but cannot be read")]
    UnreadableRegister(String),

    /// A session operation was attempted before any program was loaded.
    #[error("no program loaded")]
    NotLoaded,
}
