//! # Dispatcher Tests
//!
//! Line splitting, unknown-command and not-loaded guidance, and the
//! prompt/quit behavior of the input loop.

use std::cell::RefCell;
use std::io::Cursor;

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvdb::{CommandDescriptor, Flow, Output, Registry, Shell, ShellError};

use crate::common::fixtures::{BuildLog, capture_shell};

const NOT_LOADED: &str = "program not loaded yet, use \"load {path-to-file}\" to load assembly";

thread_local! {
    static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

fn record(_shell: &mut Shell, args: &str) -> Result<Flow, ShellError> {
    CALLS.with(|calls| calls.borrow_mut().push(args.to_string()));
    Ok(Flow::Continue)
}

fn calls() -> Vec<String> {
    CALLS.with(|calls| calls.borrow().clone())
}

fn recording_shell(requires_session: bool) -> Shell {
    CALLS.with(|calls| calls.borrow_mut().clear());
    let registry = Registry::from_table([CommandDescriptor {
        name: "echo",
        aliases: &["e"],
        requires_session,
        description: "record arguments",
        action: record,
    }])
    .unwrap();
    Shell::with_registry(registry, Output::capture(), BuildLog::default().builder())
}

#[test]
fn test_unknown_command_echoes_input_line() {
    let mut shell = recording_shell(false);
    let flow = shell.execute("  frobnicate   now ").unwrap();
    assert_eq!(flow, Flow::Continue);
    assert_eq!(
        shell.output().captured(),
        &["unknown command:   frobnicate   now , use \"help\" to get documents".to_string()]
    );
    assert!(calls().is_empty());
}

#[test]
fn test_directive_is_case_sensitive() {
    let mut shell = recording_shell(false);
    let _ = shell.execute("ECHO hi").unwrap();
    assert!(calls().is_empty());
    assert_eq!(shell.output().captured().len(), 1);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t")]
fn test_blank_lines_do_nothing(#[case] line: &str) {
    let mut shell = recording_shell(false);
    assert_eq!(shell.execute(line).unwrap(), Flow::Continue);
    assert!(shell.output().captured().is_empty());
    assert!(calls().is_empty());
}

#[rstest]
#[case("echo", "")]
#[case("echo a", "a")]
#[case("  echo   a  b  ", "a  b")]
#[case("e\tx", "x")]
fn test_rest_is_trimmed_remainder(#[case] line: &str, #[case] rest: &str) {
    let mut shell = recording_shell(false);
    let _ = shell.execute(line).unwrap();
    assert_eq!(calls(), vec![rest.to_string()]);
}

#[test]
fn test_session_guard_blocks_handler() {
    let mut shell = recording_shell(true);
    let _ = shell.execute("echo hi").unwrap();
    assert!(calls().is_empty());
    assert_eq!(shell.output().captured(), &[NOT_LOADED.to_string()]);
    assert!(!shell.session().is_loaded());
}

#[rstest]
#[case("reset")]
#[case("run")]
#[case("r")]
#[case("code")]
#[case("c")]
#[case("step")]
#[case("s")]
#[case("regs")]
fn test_standard_commands_need_a_program(#[case] line: &str) {
    let log = BuildLog::default();
    let mut shell = capture_shell(log.builder());
    assert_eq!(shell.execute(line).unwrap(), Flow::Continue);
    assert_eq!(shell.output().captured(), &[NOT_LOADED.to_string()]);
    assert!(!shell.session().is_loaded());
    assert_eq!(log.count.get(), 0);
}

#[rstest]
#[case("quit")]
#[case("q")]
#[case(" q extra ")]
fn test_quit(#[case] line: &str) {
    let mut shell = capture_shell(BuildLog::default().builder());
    assert_eq!(shell.execute(line).unwrap(), Flow::Quit);
}

#[test]
fn test_prompt_without_program() {
    let shell = capture_shell(BuildLog::default().builder());
    assert_eq!(shell.prompt_text(), ">");
}

#[test]
fn test_serve_prompts_after_every_line_and_stops_at_quit() {
    let mut shell = recording_shell(false);
    let input = Cursor::new("echo 1\n\nnope\nquit\necho 2\n");
    shell.serve(input).unwrap();
    assert_eq!(
        shell.output().captured(),
        &[
            ">".to_string(),
            ">".to_string(),
            ">".to_string(),
            "unknown command: nope, use \"help\" to get documents".to_string(),
            ">".to_string(),
            "unknown command: quit, use \"help\" to get documents".to_string(),
            ">".to_string(),
            ">".to_string(),
        ]
    );
    assert_eq!(calls(), vec!["1".to_string(), "2".to_string()]);
}

#[test]
fn test_serve_quit_ends_loop() {
    let mut shell = capture_shell(BuildLog::default().builder());
    shell.serve(Cursor::new("quit\nhelp\n")).unwrap();
    assert_eq!(shell.output().captured(), &[">".to_string()]);
}

#[test]
fn test_serve_end_of_input() {
    let mut shell = capture_shell(BuildLog::default().builder());
    shell.serve(Cursor::new("")).unwrap();
    assert_eq!(shell.output().captured(), &[">".to_string()]);
}
