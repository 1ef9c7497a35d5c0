//! Output sink.
//!
//! Every piece of text the shell produces goes through [`Output`], which
//! either writes to a stream (stdout in the binary) or captures lines in
//! memory so tests can inspect exactly what an operator would have seen.

use std::fmt;
use std::io::{self, Write};

use crate::error::ShellError;

enum Target {
    Stream(Box<dyn Write>),
    Capture(Vec<String>),
}

/// The single write channel used by the dispatcher and every command.
pub struct Output {
    target: Target,
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Stream(_) => f.write_str("Output::Stream"),
            Target::Capture(lines) => f.debug_tuple("Output::Capture").field(lines).finish(),
        }
    }
}

impl Output {
    /// Writes to standard output.
    pub fn stdout() -> Self {
        Self::stream(io::stdout())
    }

    /// Writes to an arbitrary stream.
    pub fn stream(writer: impl Write + 'static) -> Self {
        Self {
            target: Target::Stream(Box::new(writer)),
        }
    }

    /// Captures lines in memory instead of writing them anywhere.
    ///
    /// Prompts are captured as their own entries.
    pub fn capture() -> Self {
        Self {
            target: Target::Capture(Vec::new()),
        }
    }

    /// Writes one line of text.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Output`] if the underlying stream fails.
    pub fn line(&mut self, text: impl AsRef<str>) -> Result<(), ShellError> {
        match &mut self.target {
            Target::Stream(w) => writeln!(w, "{}", text.as_ref()).map_err(ShellError::Output),
            Target::Capture(lines) => {
                lines.push(text.as_ref().to_string());
                Ok(())
            }
        }
    }

    /// Writes a prompt without a trailing newline and flushes it.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Output`] if the underlying stream fails.
    pub fn prompt(&mut self, text: &str) -> Result<(), ShellError> {
        match &mut self.target {
            Target::Stream(w) => {
                write!(w, "{text}").and_then(|()| w.flush()).map_err(ShellError::Output)
            }
            Target::Capture(lines) => {
                lines.push(text.to_string());
                Ok(())
            }
        }
    }

    /// Lines captured so far; always empty for stream outputs.
    pub fn captured(&self) -> &[String] {
        match &self.target {
            Target::Stream(_) => &[],
            Target::Capture(lines) => lines.as_slice(),
        }
    }

    /// Drains the captured lines.
    pub fn take_captured(&mut self) -> Vec<String> {
        match &mut self.target {
            Target::Stream(_) => Vec::new(),
            Target::Capture(lines) => std::mem::take(lines),
        }
    }
}
