//! Command registry.
//!
//! Maps every command name and alias to exactly one [`CommandDescriptor`].
//! The registry is built once from a declarative table at startup; any name
//! claimed twice is a configuration error that aborts initialization, and
//! every conflict in the table is reported together.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::error::ShellError;
use crate::shell::{Flow, Shell};

/// Handler invoked with the shell context and the argument text after the directive.
pub type Action = fn(&mut Shell, &str) -> Result<Flow, ShellError>;

/// A named, possibly aliased command.
#[derive(Clone, Copy)]
pub struct CommandDescriptor {
    /// Canonical name, shown first in help.
    pub name: &'static str,
    /// Alternative names resolving to the same command.
    pub aliases: &'static [&'static str],
    /// When true, the dispatcher refuses the command until a program is loaded.
    pub requires_session: bool,
    /// One-line help text.
    pub description: &'static str,
    /// The handler.
    pub action: Action,
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("requires_session", &self.requires_session)
            .finish_non_exhaustive()
    }
}

impl CommandDescriptor {
    /// The canonical name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// One name claimed by two commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The contested name.
    pub name: &'static str,
    /// Canonical name of the command that claimed it first.
    pub existing: &'static str,
    /// Canonical name of the command that tried to claim it again.
    pub incoming: &'static str,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is claimed by both `{}` and `{}`",
            self.name, self.existing, self.incoming
        )
    }
}

/// Raised when a command name or alias is registered more than once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate command registration: {}", list(.conflicts))]
pub struct DuplicateCommandError {
    /// Every conflict found, in registration order.
    pub conflicts: Vec<Conflict>,
}

fn list(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Name-to-command index.
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<CommandDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a command table.
    ///
    /// # Errors
    ///
    /// Returns a [`DuplicateCommandError`] listing every conflict in the
    /// table when any name or alias is claimed more than once.
    pub fn from_table(
        table: impl IntoIterator<Item = CommandDescriptor>,
    ) -> Result<Self, DuplicateCommandError> {
        let mut registry = Self::new();
        let mut conflicts = Vec::new();
        for descriptor in table {
            if let Err(err) = registry.register(descriptor) {
                conflicts.extend(err.conflicts);
            }
        }
        if conflicts.is_empty() {
            Ok(registry)
        } else {
            Err(DuplicateCommandError { conflicts })
        }
    }

    /// Registers one command under its name and every alias.
    ///
    /// Nothing is inserted if any of its names is already taken.
    ///
    /// # Errors
    ///
    /// Returns a [`DuplicateCommandError`] naming each contested name and
    /// both owners. A command repeating its own name counts as a conflict.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), DuplicateCommandError> {
        let mut claimed: HashMap<&'static str, &'static str> = HashMap::new();
        let mut conflicts = Vec::new();
        for name in descriptor.names() {
            let existing = self
                .index
                .get(name)
                .map(|&idx| self.commands[idx].name)
                .or_else(|| claimed.get(name).copied());
            match existing {
                Some(existing) => conflicts.push(Conflict {
                    name,
                    existing,
                    incoming: descriptor.name,
                }),
                None => {
                    let _ = claimed.insert(name, descriptor.name);
                }
            }
        }
        if !conflicts.is_empty() {
            return Err(DuplicateCommandError { conflicts });
        }

        let idx = self.commands.len();
        self.commands.push(descriptor);
        for name in descriptor.names() {
            let _ = self.index.insert(name, idx);
        }
        Ok(())
    }

    /// Looks up a directive by canonical name or alias.
    pub fn resolve(&self, directive: &str) -> Option<&CommandDescriptor> {
        self.index.get(directive).map(|&idx| &self.commands[idx])
    }

    /// Every registered command exactly once, in registration order.
    pub fn list_unique(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// Number of distinct commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
