//! End-to-end CLI tests for the `quillc` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn write_source(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".qll")
        .tempfile()
        .expect("create temp source file");
    file.write_all(content.as_bytes()).expect("write source");
    file
}

fn quillc() -> Command {
    Command::cargo_bin("quillc").expect("quillc binary builds")
}

#[test]
fn clean_program_exits_zero() {
    let source = write_source("import std\ndef main() { std.print(\"hi\") }\n");
    quillc()
        .arg(source.path())
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn exit_code_equals_diagnostic_count() {
    // Two unterminated strings, two lexer diagnostics, no parser ones.
    let source = write_source("a = \"open\nb = \"open\n");
    quillc().arg(source.path()).assert().code(2);
}

#[test]
fn diagnostics_render_with_location_and_caret() {
    let source = write_source("s = \"open\n");
    quillc()
        .arg(source.path())
        .arg("--nocolor")
        .assert()
        .failure()
        .stderr(predicate::str::contains("lexer error: unterminated string literal"))
        .stderr(predicate::str::contains(":1:5"))
        .stderr(predicate::str::contains("^"));
}

#[test]
fn nocolor_strips_ansi() {
    let source = write_source("s = \"open\n");
    quillc()
        .arg(source.path())
        .arg("--nocolor")
        .assert()
        .failure()
        .stderr(predicate::str::contains("\x1b[").not());
}

#[test]
fn tokens_flag_dumps_token_stream() {
    let source = write_source("def main() { }\n");
    quillc()
        .arg(source.path())
        .arg("--tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("keyword `def`"))
        .stdout(predicate::str::contains("identifier `main`"))
        .stdout(predicate::str::contains("eof"));
}

#[test]
fn ast_flag_dumps_tree() {
    let source = write_source("def main() { return 1 }\n");
    quillc()
        .arg(source.path())
        .arg("--ast")
        .assert()
        .success()
        .stdout(predicate::str::contains("function:"))
        .stdout(predicate::str::contains("name: main"))
        .stdout(predicate::str::contains("integer 1"));
}

#[test]
fn silent_suppresses_dumps_but_not_diagnostics() {
    let source = write_source("s = \"open\n");
    quillc()
        .arg(source.path())
        .arg("--tokens")
        .arg("--ast")
        .arg("--silent")
        .arg("--nocolor")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error"));
}

#[test]
fn timer_reports_phase_timings() {
    let source = write_source("def main() { }\n");
    quillc()
        .arg(source.path())
        .arg("--timer")
        .assert()
        .success()
        .stdout(predicate::str::contains("lexing:"))
        .stdout(predicate::str::contains("parsing:"));
}

#[test]
fn missing_file_is_a_driver_error() {
    quillc()
        .arg("does_not_exist.qll")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn no_arguments_reports_usage() {
    quillc().assert().failure();
}

#[test]
fn builtin_test_suite_passes() {
    quillc()
        .arg("--test")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn parse_errors_resynchronize_across_statements() {
    // The first line is broken; the second still parses; exit code is
    // the number of diagnostics.
    let source = write_source("def 42\ndef main() { }\n");
    quillc()
        .arg(source.path())
        .arg("--ast")
        .arg("--nocolor")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("name: main"))
        .stderr(predicate::str::contains("parser error"));
}
