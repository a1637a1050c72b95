//! End-to-end tests: write a program (and optionally a settings file) to a
//! temporary directory, run the `rebind` binary on it and check stdout,
//! stderr and the exit status.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rebind"))
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Run the binary with `args` inside `dir`, feeding `stdin`.
fn run_in(dir: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(binary())
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn rebind");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn default_syntax_program() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "prog.txt",
        "x = add(2, mult(3, 4));\n[ block comment ]\noutput(x); # done\n",
    );
    let out = run_in(dir.path(), &["prog.txt"], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "x = 14\n");
}

#[test]
fn settings_file_changes_syntax() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "syntax.cfg", "(op)\nadd +\nmult *\nright=\n");
    write(dir.path(), "prog.txt", "2 + 3 * 4 = x;\noutput(x);\n");
    let out = run_in(dir.path(), &["prog.txt", "syntax.cfg"], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "x = 14\n");
}

#[test]
fn settings_found_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "rebind.cfg", "add plus\n");
    write(dir.path(), "prog.txt", "output(plus(1, 2));");
    let out = run_in(dir.path(), &["prog.txt"], "");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "plus(1, 2) = 3\n");
}

#[test]
fn input_and_bases() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.txt", "x = input();\ny = add(x, 010);\noutput(y);");
    let out = run_in(
        dir.path(),
        &["prog.txt", "base-input=2", "base-assign=16", "base-output=16"],
        "1010\n",
    );
    assert!(out.status.success(), "{}", stderr(&out));
    // 0b1010 + 0x10 = 26 = 0x1A
    assert_eq!(stdout(&out), "Enter value for x: y = 1A\n");
}

#[test]
fn error_reports_line_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.txt", "x = 1;\n\ny = div(x, 0);\noutput(x);");
    let out = run_in(dir.path(), &["prog.txt"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("line 3"), "{}", stderr(&out));
    assert!(stderr(&out).contains("division by zero"));
    assert_eq!(stdout(&out), "");
}

#[test]
fn keep_going_runs_remaining_statements() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.txt", "y = nope;\noutput(5);");
    let out = run_in(dir.path(), &["prog.txt", "--keep-going"], "");
    assert!(!out.status.success());
    assert_eq!(stdout(&out), "5 = 5\n");
    assert!(stderr(&out).contains("1 of 2 statements failed"));
}

#[test]
fn bad_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.cfg", "add +\nsub +\n");
    write(dir.path(), "prog.txt", "output(1);");
    let out = run_in(dir.path(), &["prog.txt", "bad.cfg"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("settings"), "{}", stderr(&out));
}

#[test]
fn debug_console_at_breakpoint() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.txt", "x = 5;\n#BREAKPOINT\noutput(x);");
    let out = run_in(dir.path(), &["prog.txt", "--debug"], "1\nx\n6\n");
    assert!(out.status.success(), "{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Available commands:"));
    assert!(text.contains("x = 5\n00000000 00000000 00000000 00000101"));
    assert!(text.ends_with("x = 5\n"));
}

#[test]
fn debug_console_stop() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "prog.txt", "#BREAKPOINT\noutput(1);");
    let out = run_in(dir.path(), &["prog.txt", "-d"], "7\n");
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(!stdout(&out).contains("1 = 1"));
}

#[test]
fn usage_errors() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), &[], "");
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("Usage: rebind"));

    let out = run_in(dir.path(), &["prog.txt", "base-output=99"], "");
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn missing_program_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_in(dir.path(), &["nope.txt"], "");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("nope.txt"));
}
