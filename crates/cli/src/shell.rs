//! Input loop and dispatcher.
//!
//! [`Shell`] is the explicit context every command receives. It owns the
//! registry, the session, the output sink, and the machine builder, and it
//! turns operator lines into command invocations:
//! 1. **Parse:** Trim the line and split off the directive at the first whitespace run.
//! 2. **Resolve:** Look the directive up by name or alias.
//! 3. **Guard:** Refuse commands that need a loaded program when none is loaded.
//! 4. **Invoke:** Run the handler with the trimmed remainder.
//!
//! The prompt is written once at startup and again after every line.

use std::io::BufRead;

use crate::commands;
use crate::error::ShellError;
use crate::machine::MachineBuilder;
use crate::output::Output;
use crate::registry::Registry;
use crate::session::Session;

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop the loop; the process exits successfully.
    Quit,
}

/// Shell context shared by the dispatcher and every command.
pub struct Shell {
    registry: Registry,
    session: Session,
    out: Output,
    build: MachineBuilder,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("commands", &self.registry.len())
            .field("session", &self.session)
            .field("out", &self.out)
            .finish_non_exhaustive()
    }
}

impl Shell {
    /// Creates a shell with the standard command table.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Registry`] if the table claims a name twice.
    pub fn new(out: Output, build: MachineBuilder) -> Result<Self, ShellError> {
        let registry = Registry::from_table(commands::table())?;
        Ok(Self::with_registry(registry, out, build))
    }

    /// Creates a shell around an already built registry.
    pub fn with_registry(registry: Registry, out: Output, build: MachineBuilder) -> Self {
        Self {
            registry,
            session: Session::new(),
            out,
            build,
        }
    }

    /// `<fileName>>`, or just `>` with nothing loaded.
    pub fn prompt_text(&self) -> String {
        format!("{}>", self.session.file_name().unwrap_or_default())
    }

    /// Dispatches one operator line.
    ///
    /// # Errors
    ///
    /// Propagates any unrecoverable error raised by the command.
    pub fn execute(&mut self, line: &str) -> Result<Flow, ShellError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Flow::Continue);
        }
        let (directive, rest) = trimmed
            .split_once(char::is_whitespace)
            .map_or((trimmed, ""), |(d, r)| (d, r.trim()));

        let Some(command) = self.registry.resolve(directive) else {
            tracing::debug!(directive, "unknown command");
            self.out.line(format!("unknown command: {line}, use \"help\" to get documents"))?;
            return Ok(Flow::Continue);
        };
        if command.requires_session && !self.session.is_loaded() {
            self.out.line("program not loaded yet, use \"load {path-to-file}\" to load assembly")?;
            return Ok(Flow::Continue);
        }

        let action = command.action;
        tracing::debug!(command = command.name, args = rest, "dispatch");
        action(self, rest)
    }

    /// Reads lines until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Input`] if reading fails, or any error a command propagates.
    pub fn serve<R: BufRead>(&mut self, input: R) -> Result<(), ShellError> {
        self.prompt()?;
        for line in input.lines() {
            let line = line.map_err(ShellError::Input)?;
            if self.execute(&line)? == Flow::Quit {
                return Ok(());
            }
            self.prompt()?;
        }
        tracing::debug!("end of input");
        Ok(())
    }

    fn prompt(&mut self) -> Result<(), ShellError> {
        let text = self.prompt_text();
        self.out.prompt(&text)
    }

    /// Loads `path` into the session using this shell's builder.
    ///
    /// # Errors
    ///
    /// See [`Session::load`].
    pub fn load(&mut self, path: &str) -> Result<(), ShellError> {
        self.session.load(path, &self.build)
    }

    /// Rebuilds the loaded program using this shell's builder.
    ///
    /// # Errors
    ///
    /// See [`Session::reset`].
    pub fn reset(&mut self) -> Result<(), ShellError> {
        self.session.reset(&self.build)
    }

    /// The command registry.
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The session.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The session, mutably.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The output sink.
    pub const fn output(&self) -> &Output {
        &self.out
    }

    /// The output sink, mutably.
    pub fn output_mut(&mut self) -> &mut Output {
        &mut self.out
    }
}
