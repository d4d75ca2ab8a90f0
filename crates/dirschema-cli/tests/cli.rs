// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn passing_tree_exits_zero_and_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    let schema = dir.path().join("dirschema.json");
    fs::write(&schema, r#"{"match": ".*", "type": true}"#).unwrap();

    let mut cmd = Command::cargo_bin("dirschema").unwrap();
    cmd.arg(&schema).arg(dir.path());
    cmd.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn failing_tree_exits_one_and_reports_the_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), b"hello").unwrap();
    let schema = dir.path().join("dirschema.json");
    fs::write(&schema, r#"{"match": "a\\.bin", "type": "dir"}"#).unwrap();

    let mut cmd = Command::cargo_bin("dirschema").unwrap();
    cmd.arg(&schema).arg(dir.path());
    cmd.assert().code(1).stdout(predicate::str::contains("a.bin"));
}

#[test]
fn discovers_default_schema_when_omitted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("dirschema.yaml"), "true\n").unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();

    let mut cmd = Command::cargo_bin("dirschema").unwrap();
    cmd.current_dir(dir.path());
    cmd.assert().success();
}

#[test]
fn missing_schema_and_no_default_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("dirschema").unwrap();
    cmd.current_dir(dir.path());
    cmd.assert().code(2).stderr(predicate::str::contains("no schema given"));
}

#[test]
fn json_output_format_is_valid_json() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    let schema = dir.path().join("dirschema.json");
    fs::write(&schema, "true").unwrap();

    let mut cmd = Command::cargo_bin("dirschema").unwrap();
    cmd.arg(&schema).arg(dir.path()).arg("--format").arg("json");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["ok"], serde_json::json!(true));
}
