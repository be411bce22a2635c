use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, tempdir};

/// Half adder: outputs are `a ^ b` then `a & b`.
const HALF_ADDER: &str = "2 4\n1 2\n1 2\n\n2 1 0 1 2 XOR\n2 1 0 1 3 AND\n";

/// Helper to create a temporary input file
fn create_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Helper to get the fixup binary
fn fixup_cmd() -> Command {
    Command::cargo_bin("fixup").unwrap()
}

#[test]
fn test_help_command() {
    fixup_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Circuit fixup"))
        .stdout(predicate::str::contains("EXPECTED_OUTPUT"));
}

#[test]
fn test_version_command() {
    fixup_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fixup"));
}

#[test]
fn test_missing_arguments() {
    fixup_cmd().assert().failure();
}

#[test]
fn test_basic_to_stdout() {
    let circuit = create_file(HALF_ADDER);
    // a = 1 known, b free; expect sum 0 and carry 1, i.e. b = 1.
    let public = create_file("1\n-1\n");
    let expected = create_file("0\n1\n");

    fixup_cmd()
        .arg(circuit.path())
        .arg(public.path())
        .arg(expected.path())
        .assert()
        .success()
        // sum = !b, inverted to b; carry = b; check = !(b & b)
        .stdout("2 3\n1 1\n1 1\n\n2 1 0 0 1 AND\n1 1 1 2 INV\n");
}

#[test]
fn test_output_file() {
    let circuit = create_file(HALF_ADDER);
    let public = create_file("");
    let expected = create_file("1\n0\n");
    let dir = tempdir().unwrap();
    let output_path = dir.path().join("checked.txt");

    fixup_cmd()
        .arg(circuit.path())
        .arg(public.path())
        .arg(expected.path())
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&output_path).unwrap();
    assert!(written.starts_with("5 7\n1 2\n1 1\n\n"));
    assert_eq!(written.lines().count(), 4 + 5);
}

#[test]
fn test_constant_result_fails_without_output() {
    let circuit = create_file(HALF_ADDER);
    let public = create_file("1\n1\n");
    let expected = create_file("0\n1\n");

    fixup_cmd()
        .arg(circuit.path())
        .arg(public.path())
        .arg(expected.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("reduces to the constant false"));
}

#[test]
fn test_unconstrained_output_fails() {
    let circuit = create_file(HALF_ADDER);
    let public = create_file("");
    let expected = create_file("1\n-1\n");

    fixup_cmd()
        .arg(circuit.path())
        .arg(public.path())
        .arg(expected.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("output 1 has no expected value"));
}

#[test]
fn test_bad_assignment_value_fails() {
    let circuit = create_file(HALF_ADDER);
    let public = create_file("1\n3\n");
    let expected = create_file("0\n1\n");

    fixup_cmd()
        .arg(circuit.path())
        .arg(public.path())
        .arg(expected.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid assignment value 3"));
}

#[test]
fn test_malformed_circuit_fails() {
    let circuit = create_file("2 4\n1 2\n1 2\n\n2 1 0 1 2 XOR\n2 3 0 1 3 AND\n");
    let public = create_file("");
    let expected = create_file("0\n1\n");

    fixup_cmd()
        .arg(circuit.path())
        .arg(public.path())
        .arg(expected.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 6: gate fan-out must be 1"));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    let public = create_file("");
    let expected = create_file("0\n");

    fixup_cmd()
        .arg(&missing)
        .arg(public.path())
        .arg(expected.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read circuit file"));
}
