use std::cell::{Cell, RefCell};
use std::fs;
use std::rc::Rc;

use rvdb::machine::simulator_builder;
use rvdb::{Machine, MachineBuilder, MachineConfig, Output, Shell};
use rvdb_hardware::SimError;
use tempfile::TempDir;

use super::mocks::MockSim;

/// Writes `text` to `dir/name` and returns the path as typed by an operator.
pub fn program_file(dir: &TempDir, name: &str, text: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path.to_str().unwrap().to_string()
}

/// A shell with the standard commands, capturing its output.
pub fn capture_shell(build: MachineBuilder) -> Shell {
    Shell::new(Output::capture(), build).unwrap()
}

/// A shell backed by the reference simulator.
pub fn simulator_shell() -> Shell {
    capture_shell(simulator_builder(MachineConfig::default()))
}

/// A builder producing a fresh mock from `make` on every call.
pub fn mock_builder(make: fn() -> MockSim) -> MachineBuilder {
    Box::new(move |_lines: &[String]| -> Result<Box<dyn Machine>, SimError> {
        Ok(Box::new(make()))
    })
}

/// Records every build request: the count, and the lines of the latest one.
#[derive(Clone, Default)]
pub struct BuildLog {
    /// Number of build requests.
    pub count: Rc<Cell<usize>>,
    /// Source lines of the latest request.
    pub lines: Rc<RefCell<Vec<String>>>,
}

impl BuildLog {
    /// A builder that logs each request, then fails if any line contains `fail`.
    pub fn builder(&self) -> MachineBuilder {
        let log = self.clone();
        let inner = simulator_builder(MachineConfig::default());
        Box::new(move |lines: &[String]| {
            log.count.set(log.count.get() + 1);
            *log.lines.borrow_mut() = lines.to_vec();
            if lines.iter().any(|l| l.contains("fail")) {
                return Err(SimError::Console("refused".to_string()));
            }
            inner(lines)
        })
    }
}
