use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("ebcdic-dbcs").unwrap()
}

#[test]
fn help_flag_prints_usage_with_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("decode"))
        .stdout(predicate::str::contains("encode"))
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("lookup"))
        .stdout(predicate::str::contains("verify"));
}

#[test]
fn decode_subcommand_help() {
    cmd()
        .args(["decode", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--table"))
        .stdout(predicate::str::contains("--output-encoding"))
        .stdout(predicate::str::contains("--strict"));
}

#[test]
fn encode_subcommand_help() {
    cmd()
        .args(["encode", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--input-encoding"));
}

#[test]
fn compile_subcommand_help() {
    cmd()
        .args(["compile", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--overflow-split"))
        .stdout(predicate::str::contains("--no-fallbacks"));
}

#[test]
fn missing_subcommand_fails() {
    cmd().assert().failure();
}

#[test]
fn missing_table_fails() {
    cmd().args(["info"]).assert().failure();
}

#[test]
fn nonexistent_table_reports_error() {
    cmd()
        .args(["info", "--table", "/nonexistent/table.ucm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ebcdic-dbcs"));
}
