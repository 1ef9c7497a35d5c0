//! Sparse System Memory.
//!
//! This module implements the byte-addressed memory of the simulated machine. It provides:
//! 1. **Storage:** A sparse map covering the full 32-bit address space; unwritten bytes read as zero.
//! 2. **Access Widths:** Little-endian byte, half-word, and word reads and writes.
//! 3. **Loading:** Bulk placement of assembled data segments.
//!
//! Change tracking is not done here; the simulator records old/new pairs
//! around each byte it stores.

use std::collections::HashMap;

/// System Memory structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    bytes: HashMap<u32, u8>,
}

impl Memory {
    /// Creates an empty memory where every byte reads as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a byte slice into memory starting at `addr`.
    ///
    /// Addresses wrap around the end of the 32-bit address space.
    pub fn load_bytes(&mut self, addr: u32, data: &[u8]) {
        for (offset, byte) in (0u32..).zip(data) {
            self.write_u8(addr.wrapping_add(offset), *byte);
        }
    }

    /// Reads one byte.
    pub fn read_u8(&self, addr: u32) -> u8 {
        self.bytes.get(&addr).copied().unwrap_or(0)
    }

    /// Writes one byte. Zero bytes are dropped from the map so it stays sparse.
    pub fn write_u8(&mut self, addr: u32, val: u8) {
        if val == 0 {
            let _ = self.bytes.remove(&addr);
        } else {
            let _ = self.bytes.insert(addr, val);
        }
    }

    /// Reads `len` bytes (at most 4) as a little-endian value.
    pub fn read_le(&self, addr: u32, len: u32) -> u32 {
        (0..len.min(4)).fold(0, |acc, i| {
            acc | (u32::from(self.read_u8(addr.wrapping_add(i))) << (8 * i))
        })
    }

    /// Reads a little-endian half word.
    pub fn read_u16(&self, addr: u32) -> u16 {
        self.read_le(addr, 2) as u16
    }

    /// Reads a little-endian word.
    pub fn read_u32(&self, addr: u32) -> u32 {
        self.read_le(addr, 4)
    }

    /// Reads a NUL-terminated byte string starting at `addr`.
    ///
    /// Stops after `limit` bytes if no terminator is found.
    pub fn read_c_string(&self, addr: u32, limit: usize) -> Vec<u8> {
        (0u32..)
            .map(|i| self.read_u8(addr.wrapping_add(i)))
            .take(limit)
            .take_while(|b| *b != 0)
            .collect()
    }

    /// Number of non-zero bytes currently stored.
    pub fn populated(&self) -> usize {
        self.bytes.len()
    }
}
