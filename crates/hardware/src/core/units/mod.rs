//! Execution units.
//!
//! Only the integer ALU is modelled; loads, stores and control flow are
//! handled directly by the simulator.

/// Integer arithmetic logic unit.
pub mod alu;
