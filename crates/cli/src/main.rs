//! RV32 assembly debugger shell.
//!
//! This binary wires the shell to the terminal. It performs:
//! 1. **Configuration:** Parses flags into a `MachineConfig` and a log filter.
//! 2. **Preload:** Loads an optional program file as if `load FILE` had been typed.
//! 3. **REPL:** Serves standard input until `quit` or end of input.
//!
//! Unrecoverable errors (unreadable files, programs the simulator rejects,
//! faults during execution) end the process with a failure status.

use std::error::Error;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rvdb::machine::simulator_builder;
use rvdb::{Flow, MachineConfig, Output, Shell, ShellError};

#[derive(Parser, Debug)]
#[command(
    name = "rvdb",
    author,
    version,
    about = "Interactive debugger shell for RV32 assembly",
    long_about = "Load an RV32 assembly file, then step or run it and watch registers and memory change.\n\nType \"help\" at the prompt for the command list.\n\nExamples:\n  rvdb\n  rvdb programs/fib.s\n  rvdb --step-limit 100000 --log-level debug programs/fib.s"
)]
struct Cli {
    /// Assembly file to load before the first prompt.
    file: Option<String>,

    /// Log filter for diagnostics on stderr (e.g. `warn`, `debug`, `rvdb=trace`).
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Maximum instructions a single `run` may execute.
    #[arg(long)]
    step_limit: Option<u64>,

    /// Address of the first instruction (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_address)]
    text_base: Option<u32>,

    /// Address of the first data byte (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_address)]
    data_base: Option<u32>,
}

impl Cli {
    fn machine_config(&self) -> MachineConfig {
        let defaults = MachineConfig::default();
        MachineConfig {
            text_base: self.text_base.unwrap_or(defaults.text_base),
            data_base: self.data_base.unwrap_or(defaults.data_base),
            step_limit: self.step_limit,
            ..defaults
        }
    }
}

fn parse_address(text: &str) -> Result<u32, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => text.replace('_', "").parse(),
    };
    match parsed {
        Ok(addr) if addr % 4 == 0 => Ok(addr),
        Ok(addr) => Err(format!("{addr:#010x} is not word aligned")),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_writer(io::stderr)
        .init();

    match serve(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n[!] FATAL: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("    caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn serve(cli: &Cli) -> Result<(), ShellError> {
    let config = cli.machine_config();
    tracing::debug!(?config, "machine configuration");

    let mut shell = Shell::new(Output::stdout(), simulator_builder(config))?;
    let preload = cli
        .file
        .as_ref()
        .map(|file| shell.execute(&format!("load {file}")))
        .transpose()?;
    if preload == Some(Flow::Quit) {
        return Ok(());
    }
    shell.serve(io::stdin().lock())
}
