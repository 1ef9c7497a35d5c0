//! The command set.
//!
//! Each command is a thin adapter between the dispatcher and the session or
//! the loaded machine. [`table`] is the declarative list the registry is
//! built from; its order is the order `help` prints.

use crate::diff;
use crate::error::ShellError;
use crate::registry::CommandDescriptor;
use crate::shell::{Flow, Shell};

/// Every command, in help order.
pub fn table() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor {
            name: "file",
            aliases: &["f"],
            requires_session: false,
            description: "print the full path of the loaded file",
            action: file,
        },
        CommandDescriptor {
            name: "reset",
            aliases: &[],
            requires_session: true,
            description: "rebuild the program from the loaded source, discarding all state",
            action: reset,
        },
        CommandDescriptor {
            name: "load",
            aliases: &["l"],
            requires_session: false,
            description: "read and assemble the program at {path-to-file}",
            action: load,
        },
        CommandDescriptor {
            name: "run",
            aliases: &["r"],
            requires_session: true,
            description: "run the program to completion",
            action: run,
        },
        CommandDescriptor {
            name: "code",
            aliases: &["c"],
            requires_session: true,
            description: "print the next instruction to execute",
            action: code,
        },
        CommandDescriptor {
            name: "step",
            aliases: &["s"],
            requires_session: true,
            description: "execute one instruction, print what changed and the next instruction",
            action: step,
        },
        CommandDescriptor {
            name: "regs",
            aliases: &[],
            requires_session: true,
            description: "print every register",
            action: regs,
        },
        CommandDescriptor {
            name: "help",
            aliases: &["?", "h", "man"],
            requires_session: false,
            description: "print this documentation",
            action: help,
        },
        CommandDescriptor {
            name: "quit",
            aliases: &["q"],
            requires_session: false,
            description: "exit the shell",
            action: quit,
        },
    ]
}

fn file(shell: &mut Shell, _args: &str) -> Result<Flow, ShellError> {
    let text = shell
        .session()
        .file_path()
        .unwrap_or("no file loaded")
        .to_string();
    shell.output_mut().line(text)?;
    Ok(Flow::Continue)
}

fn reset(shell: &mut Shell, _args: &str) -> Result<Flow, ShellError> {
    shell.reset()?;
    Ok(Flow::Continue)
}

fn load(shell: &mut Shell, args: &str) -> Result<Flow, ShellError> {
    if args.is_empty() {
        shell.output_mut().line("usage: load {path-to-file}")?;
        return Ok(Flow::Continue);
    }
    shell.output_mut().line(format!("loading file: {args}"))?;
    shell.load(args)?;
    shell.output_mut().line(format!("loaded file: {args}"))?;
    Ok(Flow::Continue)
}

fn run(shell: &mut Shell, _args: &str) -> Result<Flow, ShellError> {
    let machine = shell
        .session_mut()
        .machine_mut()
        .ok_or(ShellError::NotLoaded)?;
    machine.run()?;
    Ok(Flow::Continue)
}

fn code(shell: &mut Shell, _args: &str) -> Result<Flow, ShellError> {
    let text = next_instruction(shell)?;
    shell.output_mut().line(text)?;
    Ok(Flow::Continue)
}

fn step(shell: &mut Shell, _args: &str) -> Result<Flow, ShellError> {
    let machine = shell
        .session_mut()
        .machine_mut()
        .ok_or(ShellError::NotLoaded)?;
    machine.step()?;

    let mut lines: Vec<String> = machine
        .register_changes()
        .iter()
        .map(diff::register_change)
        .collect();
    lines.extend(machine.memory_changes().iter().map(diff::memory_change));
    lines.push("next:".to_string());
    lines.push(next_instruction(shell)?);

    let out = shell.output_mut();
    for line in lines {
        out.line(line)?;
    }
    Ok(Flow::Continue)
}

fn regs(shell: &mut Shell, _args: &str) -> Result<Flow, ShellError> {
    let machine = shell.session().machine().ok_or(ShellError::NotLoaded)?;
    let lines = machine
        .register_names()
        .into_iter()
        .map(|name| {
            machine
                .read_register(name)
                .map(|value| diff::register_value(name, value))
                .ok_or_else(|| ShellError::UnreadableRegister(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let out = shell.output_mut();
    for line in lines {
        out.line(line)?;
    }
    Ok(Flow::Continue)
}

fn help(shell: &mut Shell, _args: &str) -> Result<Flow, ShellError> {
    let lines: Vec<String> = shell
        .registry()
        .list_unique()
        .iter()
        .map(|command| {
            if command.aliases.is_empty() {
                format!("{}: {}", command.name, command.description)
            } else {
                format!(
                    "{} ({}): {}",
                    command.name,
                    command.aliases.join(", "),
                    command.description
                )
            }
        })
        .collect();

    let out = shell.output_mut();
    for line in lines {
        out.line(line)?;
    }
    Ok(Flow::Continue)
}

fn quit(_shell: &mut Shell, _args: &str) -> Result<Flow, ShellError> {
    tracing::debug!("quit");
    Ok(Flow::Quit)
}

fn next_instruction(shell: &Shell) -> Result<String, ShellError> {
    let machine = shell.session().machine().ok_or(ShellError::NotLoaded)?;
    let pc = machine.pc();
    Ok(diff::code(pc, machine.source_at(pc).as_ref()))
}
