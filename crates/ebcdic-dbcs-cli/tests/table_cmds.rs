//! Integration tests for `compile`, `info`, `lookup` and `verify`.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("ebcdic-dbcs").unwrap()
}

fn sample_table() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures/ucm/sample-935.ucm")
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

// --- compile ---

#[test]
fn compile_writes_loadable_blob() {
    let dir = tempfile::tempdir().unwrap();
    let blob = dir.path().join("sample.edbt");
    cmd()
        .arg("compile")
        .arg("-t")
        .arg(sample_table())
        .arg("-o")
        .arg(&blob)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    let bytes = std::fs::read(&blob).unwrap();
    assert_eq!(&bytes[..4], b"EDBT");

    cmd()
        .arg("decode")
        .arg("-t")
        .arg(&blob)
        .write_stdin(&[0x0E, 0x4C, 0x41, 0x0F][..])
        .assert()
        .success()
        .stdout("\u{4E00}");
}

#[test]
fn compile_without_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    let blob = dir.path().join("strict.edbt");
    cmd()
        .arg("compile")
        .arg("-t")
        .arg(sample_table())
        .arg("-o")
        .arg(&blob)
        .arg("--no-fallbacks")
        .assert()
        .success();

    cmd()
        .arg("lookup")
        .arg("-t")
        .arg(&blob)
        .arg("U+00A5")
        .assert()
        .success()
        .stdout(predicate::str::contains("U+00A5\tunmapped"));
}

#[test]
fn compile_with_overflow_split() {
    let dir = tempfile::tempdir().unwrap();
    let blob = dir.path().join("split.edbt");
    cmd()
        .arg("compile")
        .arg("-t")
        .arg(sample_table())
        .arg("-o")
        .arg(&blob)
        .args(["--overflow-split", "64"])
        .assert()
        .success();

    let output = cmd()
        .arg("info")
        .arg("-t")
        .arg(&blob)
        .args(["--format", "json"])
        .output()
        .unwrap();
    let info = json_stdout(&output);
    assert_eq!(info["stats"]["encode_index2_len"], 64);
    assert!(info["stats"]["encode_index2a_len"].as_u64().unwrap() > 0);
}

#[test]
fn strict_table_fails_on_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let ucm = dir.path().join("warn.ucm");
    std::fs::write(
        &ucm,
        "<code_set_name> \"ibm-935_warn\"\nCHARMAP\n<U0041> \\xC1 |0\n<U20000> \\x45\\x41 |0\nEND CHARMAP\n",
    )
    .unwrap();

    cmd()
        .arg("info")
        .arg("-t")
        .arg(&ucm)
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: [SUPPLEMENTARY]"));

    cmd()
        .arg("info")
        .arg("-t")
        .arg(&ucm)
        .arg("--strict-table")
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode"));
}

#[test]
fn recompiling_blob_with_options_warns() {
    let dir = tempfile::tempdir().unwrap();
    let blob = dir.path().join("sample.edbt");
    cmd().arg("compile").arg("-t").arg(sample_table()).arg("-o").arg(&blob).assert().success();

    let again = dir.path().join("again.edbt");
    cmd()
        .arg("compile")
        .arg("-t")
        .arg(&blob)
        .arg("-o")
        .arg(&again)
        .arg("--no-fallbacks")
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: [IGNORED_OPTIONS]"));
    assert_eq!(std::fs::read(&again).unwrap(), std::fs::read(&blob).unwrap());
}

// --- info ---

#[test]
fn info_text() {
    cmd()
        .arg("info")
        .arg("-t")
        .arg(sample_table())
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: ibm-935_P110-1999-sample"))
        .stdout(predicate::str::contains("CCSID: 935"))
        .stdout(predicate::str::contains("Substitution: 0x3F / 0xFEFE"))
        .stdout(predicate::str::contains("Params: 0xffc0/0x003f/6"))
        .stdout(predicate::str::contains("Params: 0xffe0/0x001f/5"));
}

#[test]
fn info_json() {
    let output = cmd()
        .arg("info")
        .arg("-t")
        .arg(sample_table())
        .args(["--format", "json"])
        .output()
        .unwrap();
    let info = json_stdout(&output);
    assert_eq!(info["name"], "ibm-935_P110-1999-sample");
    assert_eq!(info["ccsid"], 935);
    assert_eq!(info["stats"]["sbcs_mapped"], 20);
    assert_eq!(info["stats"]["dbcs_mapped"], 16);
    assert_eq!(info["decode_params"]["shift"], 6);
}

// --- lookup ---

#[test]
fn lookup_units_and_code_points() {
    cmd()
        .arg("lookup")
        .arg("-t")
        .arg(sample_table())
        .arg("0xC1,0x4C41-0x4C42,U+3000,U+005A")
        .assert()
        .success()
        .stdout(predicate::str::contains("0xC1\tU+0041\tA"))
        .stdout(predicate::str::contains("0x4C41\tU+4E00\t\u{4E00}"))
        .stdout(predicate::str::contains("0x4C42\tU+4E01"))
        .stdout(predicate::str::contains("U+3000\t0x4040"))
        .stdout(predicate::str::contains("U+005A\tunmapped"));
}

#[test]
fn lookup_json() {
    let output = cmd()
        .arg("lookup")
        .arg("-t")
        .arg(sample_table())
        .args(["0x4C41,U+0041,0x7041", "--format", "json"])
        .output()
        .unwrap();
    let items = json_stdout(&output);
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["unit"], 0x4C41);
    assert_eq!(items[0]["char"], "U+4E00");
    assert!(items[1]["char"].is_null());
    assert_eq!(items[2]["code_point"], 0x41);
    assert_eq!(items[2]["unit"], 0xC1);
}

#[test]
fn lookup_invalid_range() {
    cmd()
        .arg("lookup")
        .arg("-t")
        .arg(sample_table())
        .arg("0x4045-0x4040")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ends before"));
}

// --- verify ---

#[test]
fn verify_text() {
    cmd()
        .arg("verify")
        .arg("-t")
        .arg(sample_table())
        .assert()
        .success()
        .stdout(predicate::str::contains("Units mapped: 36"))
        .stdout(predicate::str::contains("0x447F -> U+FF5E -> 0x43A1  many-to-one"))
        .stdout(predicate::str::contains("0x447E -> U+2225 -> -  decode-only"))
        .stdout(predicate::str::contains("Result: consistent"));
}

#[test]
fn verify_json() {
    let output = cmd()
        .arg("verify")
        .arg("-t")
        .arg(sample_table())
        .args(["--format", "json"])
        .output()
        .unwrap();
    let report = json_stdout(&output);
    assert_eq!(report["consistent"], true);
    assert_eq!(report["round_trips"], 34);
    assert_eq!(report["asymmetries"].as_array().unwrap().len(), 2);
}
