//! Two-pass assembler.
//!
//! Builds a [`Program`] from source lines. It performs:
//! 1. **Layout:** Lexes every line, assigns label addresses, sizes each
//!    statement (pseudo-instructions may occupy two slots), and lays out data.
//! 2. **Emit:** Expands every statement into real instructions with labels
//!    resolved, and patches data words that refer to labels.
//!
//! Every error is reported with the 1-based line it came from.

/// Instruction selection and pseudo-instruction expansion.
pub mod expand;

/// Line-level lexer and literal parsing.
pub mod lexer;

use crate::common::constants::{ADDRESS_SPACE, WORD_BYTES};
use crate::common::{AsmError, SimError};
use crate::config::MachineConfig;
use crate::isa::Instruction;

use self::expand::Labels;
use self::lexer::{Statement, parse_int, parse_string};

/// Source information attached to each assembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    /// Canonical text of the real instruction.
    pub text: String,
    /// Text of the pseudo-instruction this was expanded from, if any.
    pub origin: Option<String>,
    /// Position within the pseudo-instruction's expansion, if any.
    pub expansion: Option<usize>,
    /// 1-based source line.
    pub line: usize,
}

/// One assembled instruction slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The executable instruction.
    pub instruction: Instruction,
    /// Where it came from.
    pub source: SourceRecord,
}

/// An assembled program: the text segment, the initial data segment, and its symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    text_base: u32,
    entries: Vec<Entry>,
    data_base: u32,
    data: Vec<u8>,
    labels: Labels,
}

impl Program {
    /// Returns the entry at `addr`, or `None` outside the text segment or off a word boundary.
    pub fn entry_at(&self, addr: u32) -> Option<&Entry> {
        let offset = addr.checked_sub(self.text_base)?;
        if offset % WORD_BYTES != 0 {
            return None;
        }
        self.entries.get((offset / WORD_BYTES) as usize)
    }

    /// Address of the first instruction.
    pub const fn text_base(&self) -> u32 {
        self.text_base
    }

    /// All instruction slots in address order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Address of the first data byte.
    pub const fn data_base(&self) -> u32 {
        self.data_base
    }

    /// Initial contents of the data segment.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Looks up a label's address.
    pub fn label(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Text,
    Data,
}

/// A statement waiting for the emit pass.
struct PendingText {
    line: usize,
    statement: Statement,
}

/// A data value waiting for label resolution.
struct PendingData {
    line: usize,
    offset: usize,
    width: usize,
    token: String,
}

#[derive(Default)]
struct Layout {
    section: Option<Section>,
    labels: Labels,
    unbound: Vec<(usize, String)>,
    text: Vec<PendingText>,
    text_slots: u32,
    data: Vec<u8>,
    fixups: Vec<PendingData>,
}

impl Layout {
    fn section(&self) -> Section {
        self.section.unwrap_or(Section::Text)
    }

    fn location(&self, config: &MachineConfig) -> u32 {
        match self.section() {
            Section::Text => config.text_base.wrapping_add(self.text_slots.wrapping_mul(WORD_BYTES)),
            Section::Data => config.data_base.wrapping_add(self.data.len() as u32),
        }
    }

    /// Binds labels seen since the last emission to the current location.
    fn bind(&mut self, config: &MachineConfig) -> Result<(), SimError> {
        let addr = self.location(config);
        for (line, name) in std::mem::take(&mut self.unbound) {
            if self.labels.insert(name.clone(), addr).is_some() {
                return Err(SimError::at_line(line, AsmError::DuplicateLabel(name)));
            }
        }
        Ok(())
    }

    /// Appends `count` zero bytes to the data segment and returns where they start.
    ///
    /// The segment must end at or below the top of the 32-bit address space.
    fn grow_data(
        &mut self,
        config: &MachineConfig,
        directive: &str,
        count: u64,
    ) -> Result<usize, AsmError> {
        let start = self.data.len();
        let end = u64::from(config.data_base)
            .checked_add(start as u64)
            .and_then(|end| end.checked_add(count));
        match (end, usize::try_from(count)) {
            (Some(end), Ok(count)) if end <= ADDRESS_SPACE => {
                self.data.resize(start + count, 0);
                Ok(start)
            }
            _ => Err(AsmError::SegmentOverflow {
                directive: directive.to_string(),
                requested: count,
            }),
        }
    }

    fn align_data(
        &mut self,
        config: &MachineConfig,
        directive: &str,
        align: usize,
    ) -> Result<(), AsmError> {
        let padding = (align - self.data.len() % align) % align;
        self.grow_data(config, directive, padding as u64).map(|_| ())
    }
}

/// Assembles source lines into a program.
///
/// # Errors
///
/// Returns [`SimError::Assemble`] for the first line that fails to lex,
/// size, or resolve.
pub fn assemble(lines: &[String], config: &MachineConfig) -> Result<Program, SimError> {
    let mut layout = Layout::default();

    for (idx, raw) in lines.iter().enumerate() {
        let line = idx + 1;
        let lexed = lexer::lex_line(raw).map_err(|e| SimError::at_line(line, e))?;
        layout
            .unbound
            .extend(lexed.labels.into_iter().map(|name| (line, name)));

        let Some(statement) = lexed.statement else {
            continue;
        };
        if statement.is_directive() {
            directive(&mut layout, config, line, &statement)?;
            continue;
        }
        if layout.section() == Section::Data {
            return Err(SimError::at_line(
                line,
                AsmError::InstructionInData(statement.head),
            ));
        }
        let slots = expand::size(&statement).map_err(|e| SimError::at_line(line, e))?;
        layout.bind(config)?;
        layout.text_slots += slots as u32;
        layout.text.push(PendingText { line, statement });
    }
    layout.bind(config)?;

    let mut entries = Vec::with_capacity(layout.text_slots as usize);
    for pending in &layout.text {
        let expansion = expand::expand(&pending.statement, &layout.labels)
            .map_err(|e| SimError::at_line(pending.line, e))?;
        let origin = expansion.pseudo.then(|| pending.statement.text());
        entries.extend(
            expansion
                .instructions
                .into_iter()
                .enumerate()
                .map(|(index, instruction)| Entry {
                    instruction,
                    source: SourceRecord {
                        text: instruction.to_string(),
                        origin: origin.clone(),
                        expansion: origin.as_ref().map(|_| index),
                        line: pending.line,
                    },
                }),
        );
    }

    for fixup in &layout.fixups {
        let value = match layout.labels.get(&fixup.token) {
            Some(addr) => i64::from(*addr),
            None => parse_int(&fixup.token).map_err(|e| SimError::at_line(fixup.line, e))?,
        };
        let bits = fixup.width as u32 * 8;
        let min = -(1i64 << (bits - 1));
        let max = (1i64 << bits) - 1;
        if !(min..=max).contains(&value) {
            return Err(SimError::at_line(
                fixup.line,
                AsmError::ImmediateOutOfRange {
                    mnemonic: data_directive(fixup.width).to_string(),
                    value,
                },
            ));
        }
        let bytes = (value as u32).to_le_bytes();
        layout.data[fixup.offset..fixup.offset + fixup.width]
            .copy_from_slice(&bytes[..fixup.width]);
    }

    tracing::info!(
        instructions = entries.len(),
        data_bytes = layout.data.len(),
        labels = layout.labels.len(),
        "assembled program"
    );

    Ok(Program {
        text_base: config.text_base,
        entries,
        data_base: config.data_base,
        data: layout.data,
        labels: layout.labels,
    })
}

const fn data_directive(width: usize) -> &'static str {
    match width {
        1 => ".byte",
        2 => ".half",
        _ => ".word",
    }
}

fn directive(
    layout: &mut Layout,
    config: &MachineConfig,
    line: usize,
    stmt: &Statement,
) -> Result<(), SimError> {
    let at = |e: AsmError| SimError::at_line(line, e);
    match stmt.head.as_str() {
        ".text" | ".data" => {
            layout.bind(config)?;
            layout.section = Some(if stmt.head == ".text" {
                Section::Text
            } else {
                Section::Data
            });
        }
        ".globl" | ".global" => {}
        ".word" | ".half" | ".byte" => {
            let width = match stmt.head.as_str() {
                ".word" => 4,
                ".half" => 2,
                _ => 1,
            };
            expect_data(layout, stmt).map_err(at)?;
            layout.align_data(config, &stmt.head, width).map_err(at)?;
            layout.bind(config)?;
            for token in &stmt.operands {
                let offset = layout
                    .grow_data(config, &stmt.head, width as u64)
                    .map_err(at)?;
                layout.fixups.push(PendingData {
                    line,
                    offset,
                    width,
                    token: token.clone(),
                });
            }
        }
        ".space" => {
            expect_data(layout, stmt).map_err(at)?;
            let count = single_count(stmt).map_err(at)?;
            layout.bind(config)?;
            let _ = layout.grow_data(config, &stmt.head, count).map_err(at)?;
        }
        ".align" => {
            expect_data(layout, stmt).map_err(at)?;
            let power = single_count(stmt).map_err(at)?;
            if power > 12 {
                return Err(at(AsmError::ImmediateOutOfRange {
                    mnemonic: stmt.head.clone(),
                    value: power as i64,
                }));
            }
            layout
                .align_data(config, &stmt.head, 1usize << power)
                .map_err(at)?;
        }
        ".ascii" | ".asciz" | ".string" => {
            expect_data(layout, stmt).map_err(at)?;
            layout.bind(config)?;
            for token in &stmt.operands {
                let mut bytes = parse_string(token).map_err(at)?;
                if stmt.head != ".ascii" {
                    bytes.push(0);
                }
                let start = layout
                    .grow_data(config, &stmt.head, bytes.len() as u64)
                    .map_err(at)?;
                layout.data[start..].copy_from_slice(&bytes);
            }
        }
        other => return Err(at(AsmError::UnknownDirective(other.to_string()))),
    }
    Ok(())
}

fn expect_data(layout: &Layout, stmt: &Statement) -> Result<(), AsmError> {
    if layout.section() == Section::Data {
        Ok(())
    } else {
        Err(AsmError::UnknownDirective(format!("{} in .text", stmt.head)))
    }
}

fn single_count(stmt: &Statement) -> Result<u64, AsmError> {
    let [token] = stmt.operands.as_slice() else {
        return Err(AsmError::OperandCount {
            mnemonic: stmt.head.clone(),
            expected: 1,
            found: stmt.operands.len(),
        });
    };
    let value = parse_int(token)?;
    u64::try_from(value).map_err(|_| AsmError::InvalidImmediate(token.clone()))
}
