//! Integration tests for init and config commands

#![allow(deprecated)]

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::stoic_cmd;

#[test]
fn test_init_creates_store() {
    let temp = TempDir::new().unwrap();

    stoic_cmd()
        .arg("init")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized stoic diary"));

    assert!(temp.path().join(".stoic").is_dir());

    let config = fs::read_to_string(temp.path().join(".stoic/config.toml")).unwrap();
    assert!(config.contains("model = \"gemini-3-flash-preview\""));

    let settings = fs::read_to_string(temp.path().join(".stoic/settings.json")).unwrap();
    assert!(settings.contains("\"userName\": \"Traveler\""));
    assert!(settings.contains("Stoic mentor"));
}

#[test]
fn test_init_already_initialized_fails() {
    let temp = TempDir::new().unwrap();

    stoic_cmd().arg("init").arg(temp.path()).assert().success();
    stoic_cmd()
        .arg("init")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_command_outside_diary_fails() {
    let temp = TempDir::new().unwrap();

    stoic_cmd()
        .current_dir(temp.path())
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("stoic init"));
}

#[test]
fn test_stoic_root_env() {
    let temp = TempDir::new().unwrap();
    stoic_cmd().arg("init").arg(temp.path()).assert().success();
    let elsewhere = TempDir::new().unwrap();

    stoic_cmd()
        .current_dir(elsewhere.path())
        .env("STOIC_ROOT", temp.path())
        .args(["config", "user-name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Traveler"));
}

#[test]
fn test_config_set_and_get() {
    let temp = TempDir::new().unwrap();
    stoic_cmd().arg("init").arg(temp.path()).assert().success();

    stoic_cmd()
        .current_dir(temp.path())
        .args(["config", "user-name", "Marcus"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set user-name = Marcus"));

    stoic_cmd()
        .current_dir(temp.path())
        .args(["config", "user-name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marcus"));
}

#[test]
fn test_config_api_key_is_masked() {
    let temp = TempDir::new().unwrap();
    stoic_cmd().arg("init").arg(temp.path()).assert().success();

    stoic_cmd()
        .current_dir(temp.path())
        .args(["config", "api-key", "AIzaSecretValue4321"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4321"))
        .stdout(predicate::str::contains("AIzaSecret").not());

    let settings = fs::read_to_string(temp.path().join(".stoic/settings.json")).unwrap();
    assert!(settings.contains("AIzaSecretValue4321"));

    stoic_cmd()
        .current_dir(temp.path())
        .args(["config", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api-key = "))
        .stdout(predicate::str::contains("AIzaSecret").not());
}

#[test]
fn test_config_model_written_to_toml() {
    let temp = TempDir::new().unwrap();
    stoic_cmd().arg("init").arg(temp.path()).assert().success();

    stoic_cmd()
        .current_dir(temp.path())
        .args(["config", "model", "gemini-2.5-flash"])
        .assert()
        .success();

    let config = fs::read_to_string(temp.path().join(".stoic/config.toml")).unwrap();
    assert!(config.contains("model = \"gemini-2.5-flash\""));
}

#[test]
fn test_config_reset_prompt() {
    let temp = TempDir::new().unwrap();
    stoic_cmd().arg("init").arg(temp.path()).assert().success();

    stoic_cmd()
        .current_dir(temp.path())
        .args(["config", "system-prompt", "Be a Cynic."])
        .assert()
        .success();
    stoic_cmd()
        .current_dir(temp.path())
        .args(["config", "reset-prompt"])
        .assert()
        .success();
    stoic_cmd()
        .current_dir(temp.path())
        .args(["config", "system-prompt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marcus Aurelius"));
}

#[test]
fn test_config_unknown_key() {
    let temp = TempDir::new().unwrap();
    stoic_cmd().arg("init").arg(temp.path()).assert().success();

    stoic_cmd()
        .current_dir(temp.path())
        .args(["config", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Valid keys are"));
}
