//! The simulator as seen by the shell.
//!
//! The shell never touches instruction semantics; it drives whatever
//! implements [`Machine`] and renders what it reports. The reference
//! [`Simulator`] from `rvdb-hardware` is the production implementation.

use rvdb_hardware::{ChangeRecord, MachineConfig, Reg, SimError, Simulator, SourceRecord};

/// Operations the shell needs from a simulated machine.
pub trait Machine {
    /// Executes one instruction.
    ///
    /// # Errors
    ///
    /// Returns the simulator's fault, if the instruction could not execute.
    fn step(&mut self) -> Result<(), SimError>;

    /// Executes until the program terminates.
    ///
    /// # Errors
    ///
    /// Returns the simulator's fault, if any instruction could not execute.
    fn run(&mut self) -> Result<(), SimError>;

    /// Current program counter.
    fn pc(&self) -> u32;

    /// Every register name, in display order.
    fn register_names(&self) -> Vec<&'static str>;

    /// Current value of a register, or `None` for an unknown name.
    fn read_register(&self, name: &str) -> Option<u32>;

    /// Source of the instruction at `addr`.
    fn source_at(&self, addr: u32) -> Option<SourceRecord>;

    /// Registers changed by the last step, keyed by symbolic name.
    fn register_changes(&self) -> Vec<ChangeRecord<String, u32>>;

    /// Memory bytes changed by the last step, keyed by address.
    fn memory_changes(&self) -> Vec<ChangeRecord<u32, u8>>;
}

/// Constructs a machine from source lines.
pub type MachineBuilder = Box<dyn Fn(&[String]) -> Result<Box<dyn Machine>, SimError>>;

/// Builder producing reference simulators with the given configuration.
pub fn simulator_builder(config: MachineConfig) -> MachineBuilder {
    Box::new(move |lines: &[String]| -> Result<Box<dyn Machine>, SimError> {
        let sim = Simulator::from_source(lines, &config)?;
        Ok(Box::new(sim))
    })
}

impl Machine for Simulator {
    fn step(&mut self) -> Result<(), SimError> {
        let outcome = Self::step(self)?;
        tracing::trace!(?outcome, "stepped");
        Ok(())
    }

    fn run(&mut self) -> Result<(), SimError> {
        let executed = Self::run(self)?;
        tracing::debug!(executed, exit_code = ?self.exit_code(), "run finished");
        Ok(())
    }

    fn pc(&self) -> u32 {
        Self::pc(self)
    }

    fn register_names(&self) -> Vec<&'static str> {
        Reg::all().map(Reg::name).collect()
    }

    fn read_register(&self, name: &str) -> Option<u32> {
        self.read_by_name(name)
    }

    fn source_at(&self, addr: u32) -> Option<SourceRecord> {
        Self::source_at(self, addr).cloned()
    }

    fn register_changes(&self) -> Vec<ChangeRecord<String, u32>> {
        Self::register_changes(self)
            .map(|c| ChangeRecord {
                key: c.key.name().to_string(),
                previous: c.previous,
                current: c.current,
            })
            .collect()
    }

    fn memory_changes(&self) -> Vec<ChangeRecord<u32, u8>> {
        Self::memory_changes(self).copied().collect()
    }
}
