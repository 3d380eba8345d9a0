//! Integration tests for ducky

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn ducky_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("ducky");
    // Keep the tests hermetic: no ambient NuGet credentials
    cmd.env_remove("NUGET_API_KEY")
        .env_remove("DUCKY_NUGET_API_KEY")
        .env_remove("NUGET_SERVER")
        .env_remove("DUCKY_NUGET_SERVER")
        .env_remove("STEAM_APP_ID");
    cmd
}

/// A directory that passes both validators
fn write_valid_mod(dir: &Path) {
    fs::write(
        dir.join("info.ini"),
        "name=TestMod\nversion=1.0.0\ndescription=A test mod\n",
    )
    .expect("write info.ini");
    fs::write(dir.join("TestMod.dll"), b"binary").expect("write dll");
    fs::write(dir.join("preview.png"), b"png").expect("write preview");
}

#[test]
fn test_version() {
    ducky_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ducky"));
}

#[test]
fn test_help() {
    ducky_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Steam Workshop"));
}

#[test]
fn test_invalid_command() {
    ducky_cmd().arg("invalid").assert().failure();
}

#[test]
fn test_nuget_validate_passes() {
    let dir = TempDir::new().expect("temp dir");
    write_valid_mod(dir.path());

    ducky_cmd()
        .args(["nuget", "validate"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("validation passed"));
}

#[test]
fn test_nuget_validate_reports_dll_mismatch() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join("info.ini"),
        "name=Baz\nversion=1.0.0\ndescription=A test mod\n",
    )
    .expect("write info.ini");
    fs::write(dir.path().join("Foo.dll"), b"binary").expect("write dll");
    fs::write(dir.path().join("Bar.dll"), b"binary").expect("write dll");

    ducky_cmd()
        .args(["nuget", "validate"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No DLL file matches mod name"))
        .stderr(predicate::str::contains("Foo.dll"))
        .stderr(predicate::str::contains("Bar.dll"));
}

#[test]
fn test_nuget_validate_missing_metadata() {
    let dir = TempDir::new().expect("temp dir");

    ducky_cmd()
        .args(["nuget", "validate"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("info.ini not found"));
}

#[test]
fn test_nuget_push_requires_api_key() {
    let dir = TempDir::new().expect("temp dir");
    write_valid_mod(dir.path());

    ducky_cmd()
        .args(["nuget", "push"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No NuGet API key configured"))
        .stderr(predicate::str::contains("NUGET_API_KEY"));
}

#[test]
fn test_nuget_push_without_pack_needs_nupkg_file() {
    let dir = TempDir::new().expect("temp dir");
    write_valid_mod(dir.path());

    // A directory is not a .nupkg; push should point at --pack
    ducky_cmd()
        .args(["nuget", "push"])
        .arg(dir.path())
        .env("NUGET_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains(".nupkg file not found"))
        .stderr(predicate::str::contains("--pack"));
}

#[test]
fn test_nuget_push_rejects_bad_server_url() {
    let dir = TempDir::new().expect("temp dir");
    write_valid_mod(dir.path());

    ducky_cmd()
        .args(["nuget", "push"])
        .arg(dir.path())
        .args(["--server", "ftp://not-a-nuget-server"])
        .env("NUGET_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid NuGet server URL"));
}

#[test]
fn test_steam_validate_passes() {
    let dir = TempDir::new().expect("temp dir");
    write_valid_mod(dir.path());

    ducky_cmd()
        .args(["steam", "validate"])
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("validation passed"));
}

#[test]
fn test_steam_validate_reports_missing_preview_and_ini() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("TestMod.dll"), b"binary").expect("write dll");

    ducky_cmd()
        .args(["steam", "validate"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("info.ini not found"))
        .stderr(predicate::str::contains("preview.png not found"));
}

#[test]
fn test_steam_validate_rejects_bad_app_id() {
    let dir = TempDir::new().expect("temp dir");
    write_valid_mod(dir.path());

    ducky_cmd()
        .args(["steam", "validate"])
        .arg(dir.path())
        .env("STEAM_APP_ID", "not-a-number")
        .assert()
        .failure()
        .stderr(predicate::str::contains("STEAM_APP_ID"));
}

// The default build has no Steamworks backend: push must run the worker,
// relay its failure with suggestions, and exit non-zero.
#[cfg(not(feature = "steamworks-backend"))]
#[test]
fn test_steam_push_relays_worker_failure() {
    let dir = TempDir::new().expect("temp dir");
    write_valid_mod(dir.path());

    ducky_cmd()
        .args(["steam", "push"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Steamworks backend"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn test_upload_worker_is_hidden_from_help() {
    ducky_cmd()
        .args(["steam", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("upload-worker").not());
}
