//! Trace line rendering.
//!
//! Turns change records, register values, and source records into the
//! fixed-width hexadecimal lines printed by `step`, `code`, and `regs`.
//! Words (register values and addresses) are eight hex digits, bytes two,
//! always uppercase with a `0x` prefix.

use std::fmt::Display;

use rvdb_hardware::{ChangeRecord, SourceRecord};

/// Formats a full machine word.
pub fn word(value: u32) -> String {
    format!("0x{value:08X}")
}

/// Formats a single byte.
pub fn byte(value: u8) -> String {
    format!("0x{value:02X}")
}

/// `$<name>: 0x<old> -> 0x<new>`
pub fn register_change<K: Display>(change: &ChangeRecord<K, u32>) -> String {
    format!(
        "${}: {} -> {}",
        change.key,
        word(change.previous),
        word(change.current)
    )
}

/// `0x<addr>: 0x<old> -> 0x<new>`, with the address zero-extended to a full word.
pub fn memory_change(change: &ChangeRecord<u32, u8>) -> String {
    format!(
        "{}: {} -> {}",
        word(change.key),
        byte(change.previous),
        byte(change.current)
    )
}

/// `$<name>: 0x<value>`
pub fn register_value(name: &str, value: u32) -> String {
    format!("${name}: {}", word(value))
}

/// The instruction at `pc`: `0x<pc>: <text>`, followed by
/// `(<origin> #<index>)` when it came from a pseudo-instruction.
pub fn code(pc: u32, source: Option<&SourceRecord>) -> String {
    let Some(source) = source else {
        return format!("{}: <end of program>", word(pc));
    };
    match (&source.origin, source.expansion) {
        (Some(origin), Some(index)) => {
            format!("{}: {} ({} #{})", word(pc), source.text, origin, index)
        }
        _ => format!("{}: {}", word(pc), source.text),
    }
}
