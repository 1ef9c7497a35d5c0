//! System-on-chip components.
//!
//! The reference machine has no devices; the only component is main memory.

/// Sparse byte-addressed main memory.
pub mod memory;

pub use memory::Memory;
