//! Per-step change tracking.
//!
//! The simulator funnels every architectural write through a
//! [`ChangeTracker`], which keeps the value each location held at the start
//! of the step together with its latest value. Locations are reported in the
//! order they were first written, once each, and only if the value actually
//! changed.

use crate::common::Reg;

/// A single observed mutation of one register or memory cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeRecord<K, V> {
    /// Register or address that changed.
    pub key: K,
    /// Value before the step.
    pub previous: V,
    /// Value after the step.
    pub current: V,
}

impl<K, V: PartialEq> ChangeRecord<K, V> {
    /// Returns true when the location ends the step holding a different value.
    pub fn is_change(&self) -> bool {
        self.previous != self.current
    }
}

/// Accumulates register and memory writes for one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeTracker {
    registers: Vec<ChangeRecord<Reg, u32>>,
    memory: Vec<ChangeRecord<u32, u8>>,
}

impl ChangeTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything recorded so far. Called at the start of each step.
    pub fn clear(&mut self) {
        self.registers.clear();
        self.memory.clear();
    }

    /// Records a register write.
    pub fn record_register(&mut self, key: Reg, previous: u32, current: u32) {
        record(&mut self.registers, key, previous, current);
    }

    /// Records a memory byte write.
    pub fn record_memory(&mut self, addr: u32, previous: u8, current: u8) {
        record(&mut self.memory, addr, previous, current);
    }

    /// Registers whose value differs from the start of the step.
    pub fn registers(&self) -> impl Iterator<Item = &ChangeRecord<Reg, u32>> {
        self.registers.iter().filter(|c| c.is_change())
    }

    /// Memory bytes whose value differs from the start of the step.
    pub fn memory(&self) -> impl Iterator<Item = &ChangeRecord<u32, u8>> {
        self.memory.iter().filter(|c| c.is_change())
    }
}

fn record<K: PartialEq, V>(log: &mut Vec<ChangeRecord<K, V>>, key: K, previous: V, current: V) {
    match log.iter_mut().find(|c| c.key == key) {
        Some(existing) => existing.current = current,
        None => log.push(ChangeRecord {
            key,
            previous,
            current,
        }),
    }
}
