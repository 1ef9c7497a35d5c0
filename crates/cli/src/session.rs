//! Session state.
//!
//! A session is either empty or holds one loaded program: its source lines,
//! the machine built from them, and the file it came from. All four are kept
//! in a single [`LoadedProgram`] so they are always present together.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::ShellError;
use crate::machine::{Machine, MachineBuilder};

/// A successfully loaded program.
pub struct LoadedProgram {
    source: Vec<String>,
    machine: Box<dyn Machine>,
    path: String,
    name: String,
}

impl fmt::Debug for LoadedProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedProgram")
            .field("path", &self.path)
            .field("lines", &self.source.len())
            .finish_non_exhaustive()
    }
}

/// What the operator currently has loaded, if anything.
#[derive(Debug, Default)]
pub struct Session {
    loaded: Option<LoadedProgram>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `path`, builds a machine from its lines, and replaces the current program.
    ///
    /// The previous program survives untouched if reading or building fails.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Read`] if the file cannot be read, or
    /// [`ShellError::Simulator`] if the machine rejects the program.
    pub fn load(&mut self, path: &str, build: &MachineBuilder) -> Result<(), ShellError> {
        let text = fs::read_to_string(path).map_err(|source| ShellError::Read {
            path: path.to_string(),
            source,
        })?;
        let source: Vec<String> = text.lines().map(str::to_owned).collect();
        let machine = build(source.as_slice())?;

        let name = Path::new(path)
            .file_name()
            .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned());
        tracing::info!(path, lines = source.len(), "program loaded");
        self.loaded = Some(LoadedProgram {
            source,
            machine,
            path: path.to_string(),
            name,
        });
        Ok(())
    }

    /// Rebuilds the machine from the loaded source, discarding all execution state.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::NotLoaded`] without a program, or
    /// [`ShellError::Simulator`] if the machine cannot be rebuilt.
    pub fn reset(&mut self, build: &MachineBuilder) -> Result<(), ShellError> {
        let loaded = self.loaded.as_mut().ok_or(ShellError::NotLoaded)?;
        loaded.machine = build(loaded.source.as_slice())?;
        tracing::info!(path = %loaded.path, "program reset");
        Ok(())
    }

    /// Returns true once a program has been loaded.
    pub const fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Full path of the loaded file.
    pub fn file_path(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.path.as_str())
    }

    /// Base name of the loaded file, as shown in the prompt.
    pub fn file_name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.name.as_str())
    }

    /// Source lines of the loaded program.
    pub fn source(&self) -> Option<&[String]> {
        self.loaded.as_ref().map(|l| l.source.as_slice())
    }

    /// The loaded machine.
    pub fn machine(&self) -> Option<&dyn Machine> {
        self.loaded.as_ref().map(|l| l.machine.as_ref())
    }

    /// The loaded machine, mutably.
    pub fn machine_mut(&mut self) -> Option<&mut (dyn Machine + 'static)> {
        match &mut self.loaded {
            Some(loaded) => Some(loaded.machine.as_mut()),
            None => None,
        }
    }
}
