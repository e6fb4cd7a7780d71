//! CLI tests for the `sablec` binary: exit codes, diagnostics on stderr,
//! file and stdin input, and the AST dump flag.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn sablec() -> Command {
    Command::cargo_bin("sablec").expect("sablec binary builds")
}

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write source");
    file
}

#[test]
fn valid_program_exits_zero() {
    let file = source_file("func main() -> int { return 0; }");

    sablec().arg(file.path()).assert().success();
}

#[test]
fn reads_from_stdin_without_argument() {
    sablec()
        .write_stdin("int x = 3;")
        .assert()
        .success();
}

#[test]
fn redefinition_fails_with_diagnostic() {
    let file = source_file("int x; int x;");

    sablec()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("redefinition of 'x'"));
}

#[test]
fn undefined_name_fails_with_diagnostic() {
    let file = source_file("int x = nope;");

    sablec()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("undefined name 'nope'"));
}

#[test]
fn type_error_fails_with_position() {
    // The bad operand sits on line 1.
    let file = source_file("bool b = 1 & true;");

    sablec()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: 1:"));
}

#[test]
fn emit_ast_prints_canonical_source() {
    let file = source_file("int x = 3;");

    sablec()
        .arg("--emit-ast")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("int x = 3;"));
}

#[test]
fn emit_ast_shows_extracted_methods() {
    let file = source_file("struct P { int x; func get() -> int { return x; } }");

    sablec()
        .arg("--emit-ast")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("func P_get(P this) -> int {"));
}

#[test]
fn missing_file_is_an_error() {
    sablec()
        .arg("does-not-exist.sbl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open file"));
}

#[test]
fn unknown_option_is_rejected() {
    sablec()
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown option"));
}

#[test]
fn multiple_errors_are_all_reported() {
    let file = source_file("int x = a; int y = b;");

    sablec()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("'a'").and(predicate::str::contains("'b'")));
}
