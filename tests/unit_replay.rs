//! Unit tests for batch replay from files


use std::fs;
use std::path::{Path, PathBuf};

use generators::{output, session};
use setcalc::command::Action;
use setcalc::CalcError;
use tempfile::tempdir;

fn write_batch(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write batch file");
    path
}

#[test]
fn test_unknown_command_then_abort() {
    let dir = tempdir().unwrap();
    let path = write_batch(dir.path(), "ops.txt", "frobnicate 1 2\nuni 0 1\n");
    let mut state = session("N\n", 5);

    let summary = state.replay_from_file(&path).expect("file opened");

    assert_eq!(summary.processed, 1);
    assert!(summary.aborted);
    assert_eq!(summary.errors.len(), 1);
    assert!(matches!(
        &summary.errors[0],
        CalcError::Line { number: 1, line, .. } if line == "frobnicate 1 2"
    ));
    assert_eq!(state.table.len(), 3, "uni line must not run");

    let out = output(&state);
    assert!(out.contains("Command not found"));
    assert!(out.contains("Error at line 1"));
    assert!(out.contains("would you like to continue reading the file?"));
}

#[test]
fn test_unknown_command_then_continue() {
    let dir = tempdir().unwrap();
    let path = write_batch(dir.path(), "ops.txt", "frobnicate\nuni 0 1\n");
    let mut state = session("maybe\ny\n", 5);

    let summary = state.replay_from_file(&path).unwrap();

    assert_eq!(summary.processed, 2);
    assert!(!summary.aborted);
    assert_eq!(state.table.len(), 4);
    assert!(output(&state).contains("Bad Input: maybe not valid option"));
}

#[test]
fn test_capacity_failure_moves_on_without_prompt() {
    let dir = tempdir().unwrap();
    let path = write_batch(dir.path(), "ops.txt", "uni 0 1\nuni 0 2\ninter 1 2\n");
    // Empty console: any prompt would count as "no" and abort
    let mut state = session("", 4);

    let summary = state.replay_from_file(&path).unwrap();

    assert_eq!(summary.processed, 3);
    assert!(summary.errors.is_empty());
    assert!(!summary.aborted);
    assert_eq!(state.table.len(), 4);

    let out = output(&state);
    assert_eq!(out.matches("not enough space for new operation").count(), 2);
    assert!(!out.contains("would you like to continue"));
}

#[test]
fn test_bad_arguments_prompt_with_line() {
    let dir = tempdir().unwrap();
    let path = write_batch(dir.path(), "ops.txt", "del 9\n\ndel 0\neval 0 2 1\n");
    let mut state = session("y\nn\n", 5);

    let summary = state.replay_from_file(&path).unwrap();

    // Blank line skipped; line numbers follow the file
    assert_eq!(summary.processed, 3);
    assert_eq!(summary.errors.len(), 2);
    assert!(matches!(
        &summary.errors[0],
        CalcError::Line { number: 1, source, .. }
            if matches!(**source, CalcError::IndexOutOfRange { index: 9, .. })
    ));
    assert!(matches!(
        &summary.errors[1],
        CalcError::Line { number: 4, source, .. }
            if matches!(**source, CalcError::Parse(_))
    ));
    assert!(summary.aborted);
    assert_eq!(state.table.len(), 2);

    let out = output(&state);
    assert!(out.contains("Error at line 1"));
    assert!(out.contains("Operation #9 doesn't exist"));
}

#[test]
fn test_missing_file_is_invalid_path() {
    let dir = tempdir().unwrap();
    let mut state = session("", 3);
    let result = state.replay_from_file(&dir.path().join("absent.txt"));
    assert!(matches!(result, Err(CalcError::InvalidPath(_))));
}

#[test]
fn test_blank_file_is_invalid_path() {
    let dir = tempdir().unwrap();
    let path = write_batch(dir.path(), "blank.txt", "\n   \n\t\n");
    let mut state = session("", 3);
    assert!(matches!(
        state.replay_from_file(&path),
        Err(CalcError::InvalidPath(_))
    ));
}

#[test]
fn test_console_restored_after_replay() {
    let dir = tempdir().unwrap();
    let path = write_batch(dir.path(), "ops.txt", "oops\n");
    let mut state = session("Y\nhelp\n", 3);

    state.replay_from_file(&path).unwrap();

    // The next command comes from the console again
    assert_eq!(state.step().unwrap(), Some(Action::Help));
}

#[test]
fn test_read_command_dispatches_replay() {
    let dir = tempdir().unwrap();
    let path = write_batch(dir.path(), "ops.txt", "prod 0 1\nresize 4 y\n");
    let script = format!("uni 0 2\nread {}\n", path.display());
    let mut state = session(&script, 10);

    state.step().unwrap();
    assert_eq!(state.step().unwrap(), Some(Action::Read));

    // prod appended a fifth entry, the resize dropped it again
    assert_eq!(state.table.len(), 4);
    assert_eq!(state.table.capacity(), 4);
    let out = output(&state);
    assert!(out.contains("Read 2 line(s)"));
    assert!(!out.contains("please enter the path"));
}

#[test]
fn test_read_command_asks_for_path() {
    let dir = tempdir().unwrap();
    let path = write_batch(dir.path(), "ops.txt", "diff 1 0\n");
    let script = format!("read\n{}\n", path.display());
    let mut state = session(&script, 5);

    state.step().unwrap();
    assert_eq!(state.table.len(), 4);
    assert!(output(&state).contains("please enter the path to the file:"));
}

#[test]
fn test_read_command_with_bad_path() {
    let mut state = session("read /definitely/not/here.txt\n", 3);
    assert!(matches!(state.step(), Err(CalcError::InvalidPath(_))));
}

#[test]
fn test_nested_read() {
    let dir = tempdir().unwrap();
    let inner = write_batch(dir.path(), "inner.txt", "diff 1 0\n");
    let outer = write_batch(
        dir.path(),
        "outer.txt",
        &format!("read {}\nuni 0 1\n", inner.display()),
    );
    let mut state = session("", 10);

    let summary = state.replay_from_file(&outer).unwrap();

    assert_eq!(summary.processed, 2);
    assert!(summary.errors.is_empty());
    assert_eq!(state.table.len(), 5);
}

#[test]
fn test_self_including_file_stops() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("loop.txt");
    fs::write(&path, format!("read {}\n", path.display())).unwrap();
    let mut state = session("", 3);

    let summary = state.replay_from_file(&path).unwrap();

    assert_eq!(summary.processed, 1);
    assert!(output(&state).contains("too many nested reads"));
    assert!(state.is_running());
}

#[test]
fn test_exit_inside_file_stops_replay() {
    let dir = tempdir().unwrap();
    let path = write_batch(dir.path(), "ops.txt", "exit\nuni 0 1\n");
    let mut state = session("", 5);

    let summary = state.replay_from_file(&path).unwrap();

    assert_eq!(summary.processed, 1);
    assert!(!state.is_running());
    assert_eq!(state.table.len(), 3);
}

#[test]
fn test_lines_are_echoed_with_menu_between() {
    let dir = tempdir().unwrap();
    let path = write_batch(dir.path(), "ops.txt", "eval 0 1 1 1 2\neval 1 1 1 1 1\n");
    let mut state = session("", 3);

    state.replay_from_file(&path).unwrap();

    let out = output(&state);
    assert!(out.contains("eval 0 1 1 1 2\n"));
    assert!(out.contains("({1} ∪ {2}) = {1, 2}"));
    assert!(out.contains("({1} ∩ {1}) = {1}"));
    assert_eq!(out.matches("List of available set operations:").count(), 1);
}
