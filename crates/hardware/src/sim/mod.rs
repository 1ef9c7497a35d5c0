//! Program execution and change tracking.
//!
//! Provides the `Simulator` that executes an assembled program and the
//! tracker that records what each step changed.

/// Instruction-level simulator.
pub mod simulator;

/// Per-step register and memory change tracking.
pub mod tracker;

pub use simulator::{Simulator, StepOutcome};
pub use tracker::{ChangeRecord, ChangeTracker};
