#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/flags.toml")
}

fn bitf() -> Command {
    let mut cmd = Command::cargo_bin("bitf").unwrap();
    cmd.env_remove("RUST_LOG").arg("--schema").arg(fixture());
    cmd
}

#[test]
fn lists_fields_and_composites() {
    bitf()
        .arg("fields")
        .assert()
        .success()
        .stdout(predicate::str::contains("flags_1\t4 flags\tdefault 6"))
        .stdout(predicate::str::contains("legacy\t11 flags\tdefault 0"))
        .stdout(predicate::str::contains("flags\tcomposite of flags_1, flags_2"));
}

#[test]
fn decodes_stored_value() {
    bitf()
        .args(["decode", "flags_1", "3"])
        .assert()
        .success()
        .stdout("value\t3\nFLAG_0\ton\nFLAG_1\ton\nFLAG_2\toff\nFLAG_3\toff\n");
}

#[test]
fn decodes_negative_value_by_recovery() {
    bitf()
        .args(["--json", "decode", "flags_1", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""value":15"#))
        .stdout(predicate::str::contains(r#""enabled":["FLAG_0","FLAG_1","FLAG_2","FLAG_3"]"#));
}

#[test]
fn encodes_flag_names() {
    bitf().args(["encode", "flags_1", "FLAG_1", "FLAG_2"]).assert().success().stdout("6\n");
    bitf().args(["encode", "legacy", "tenth"]).assert().success().stdout("1024\n");
}

#[test]
fn unknown_flag_fails() {
    bitf()
        .args(["encode", "flags_1", "FLAG_9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FLAG_9"));
}

#[test]
fn prints_filter_fragments() {
    bitf()
        .args(["filter", "flags_1", "FLAG_1"])
        .assert()
        .success()
        .stdout("(\"flags_1\" & 2) = 2\n");

    bitf()
        .args(["filter", "flags_1", "FLAG_1", "--clear", "--table", "T0"])
        .assert()
        .success()
        .stdout("(\"T0\".\"flags_1\" & 2) = 0\n");
}

#[test]
fn prints_update_fragments_per_dialect() {
    bitf()
        .args(["update", "flags_2", "FLAG_6", "clear"])
        .assert()
        .success()
        .stdout("\"flags_2\" & ~4\n");

    bitf()
        .args(["update", "flags_2", "FLAG_6", "toggle", "--dialect", "postgresql"])
        .assert()
        .success()
        .stdout("\"flags_2\" # 4\n");

    bitf()
        .args(["update", "flags_2", "FLAG_6", "toggle", "--dialect", "sqlite"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported dialect"));
}

#[test]
fn fragment_json_carries_params() {
    bitf()
        .args(["--json", "update", "flags_1", "FLAG_3", "set"])
        .assert()
        .success()
        .stdout("{\"sql\":\"\\\"flags_1\\\" | %s\",\"params\":[8]}\n");
}

#[test]
fn lists_choices_with_labels() {
    bitf()
        .args(["choices", "flags_2"])
        .assert()
        .success()
        .stdout("FLAG_4\tFLAG_4\nFLAG_5\tFifth flag\nFLAG_6\tSixth flag\nFLAG_7\tFLAG_7\n");
}

#[test]
fn environment_overrides_file() {
    bitf()
        .env("BITF__FIELDS__FLAGS_1__DEFAULT", "1")
        .arg("fields")
        .assert()
        .success()
        .stdout(predicate::str::contains("flags_1\t4 flags\tdefault 1"));
}

#[test]
fn missing_schema_fails() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("bitf")
        .unwrap()
        .arg("--schema")
        .arg(dir.path().join("absent.toml"))
        .arg("fields")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}
