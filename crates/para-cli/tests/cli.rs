//! Integration tests for para CLI.

#![allow(deprecated)] // cargo_bin is deprecated but the replacement requires macros

use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;
use tempfile::TempDir;

fn para(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("para").unwrap();
    cmd.current_dir(dir.path())
        .env("PARA_CONFIG_FILE", dir.path().join("no-global.toml"))
        .env_remove("PARA_COMPILER")
        .timeout(Duration::from_secs(30));
    cmd
}

#[test]
fn test_help() {
    let temp = TempDir::new().unwrap();
    para(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Para compiler"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("syntax-check"));
}

#[test]
fn test_version() {
    let temp = TempDir::new().unwrap();
    para(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("para"))
        .stdout(predicate::str::is_match(r"\d+\.\d+\.\d+").unwrap());
}

#[test]
fn test_no_command_shows_help() {
    let temp = TempDir::new().unwrap();
    para(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_keep_open_does_not_block_without_terminal() {
    let temp = TempDir::new().unwrap();
    para(&temp)
        .args(["--no-input", "--keep-open"])
        .assert()
        .success();
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let temp = TempDir::new().unwrap();
    para(&temp).arg("frobnicate").assert().code(2);
}

#[test]
fn test_syntax_check_without_file_and_input() {
    let temp = TempDir::new().unwrap();
    para(&temp)
        .args(["--no-input", "syntax-check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing input"))
        .stderr(predicate::str::contains("Aborted"));
}

#[test]
fn test_syntax_check_missing_source() {
    let temp = TempDir::new().unwrap();
    para(&temp)
        .args(["--no-input", "syntax-check", "-f", "absent.para"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Source file does not exist"))
        .stderr(predicate::str::contains("absent.para"));
}

#[test]
fn test_compile_without_files() {
    let temp = TempDir::new().unwrap();
    para(&temp)
        .args(["--no-input", "compile"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--file"));
    // Nothing is provisioned before the input is validated.
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_missing_backend() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("main.para"), "").unwrap();
    para(&temp)
        .env("PARA_COMPILER", "para-backend-that-does-not-exist")
        .args(["--no-input", "compile", "-f", "main.para"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Aborted"));
}

#[test]
fn test_invalid_config() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("para.toml"), "[output\n").unwrap();
    para(&temp)
        .args(["--no-input", "syntax-check", "-f", "main.para"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("para.toml"));
}
