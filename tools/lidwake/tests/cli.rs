//! Integration tests for the lidwake binary.
//!
//! These tests run the built binary as a subprocess against fixture sysfs
//! trees and identity files under `tests/fixtures/`.

use std::path::PathBuf;
use std::process::{Command, Output};

/// Path to the fixture directory.
fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Runs `lidwake` with `args` from inside the fixture directory.
fn lidwake(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lidwake"))
        .args(args)
        .current_dir(fixtures())
        .output()
        .expect("failed to execute lidwake")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Asserts success, printing both streams on failure.
fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "lidwake failed (exit={:?}):\nstdout:\n{}\nstderr:\n{}",
        output.status.code(),
        stdout(output),
        stderr(output),
    );
}

// ---------------------------------------------------------------------------
// table / modalias
// ---------------------------------------------------------------------------

#[test]
fn table_lists_every_model() {
    let output = lidwake(&["table"]);
    assert_success(&output);
    let out = stdout(&output);
    // Header plus one line per model.
    assert_eq!(out.lines().count(), 12);
    assert!(out.contains("Surface Book 2"));
    assert!(out.contains("sku=Surface_Laptop_3_1867:1868"));
}

#[test]
fn table_json() {
    let output = lidwake(&["table", "--json"]);
    assert_success(&output);
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 11);
    assert_eq!(rows[0]["ident"], "Surface Pro 4");
    assert_eq!(rows[0]["gpe"], 0x17);
    assert_eq!(rows[0]["acpi-path"], "\\_SB.LID0");
    assert_eq!(rows[1]["product-sku"], "Surface_Pro_1796");
    assert!(rows[1]["product-name"].is_null());
}

#[test]
fn modalias_prints_one_alias_per_model() {
    let output = lidwake(&["modalias"]);
    assert_success(&output);
    let out = stdout(&output);
    let aliases: Vec<&str> = out.lines().collect();
    assert_eq!(aliases.len(), 11);
    assert_eq!(aliases[0], "dmi:*:svnMicrosoftCorporation:pnSurfacePro4:*");
}

// ---------------------------------------------------------------------------
// match
// ---------------------------------------------------------------------------

#[test]
fn match_reads_sysfs() {
    let root = fixtures().join("surface-pro-6");
    let output = lidwake(&["match", "--sysfs-root", root.to_str().unwrap()]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "Surface Pro 6: lid \\_SB.LID0 on GPE 0x4f");
}

#[test]
fn match_unlisted_machine() {
    let root = fixtures().join("acme-widget");
    let output = lidwake(&["match", "--sysfs-root", root.to_str().unwrap()]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "No lid quirk needed for Acme Widget");
}

#[test]
fn match_identity_file() {
    let output = lidwake(&["match", "--identity", "surface-laptop-3-amd.toml"]);
    assert_success(&output);
    assert!(stdout(&output).starts_with("No lid quirk needed"));
}

#[test]
fn match_identity_from_config() {
    let output = lidwake(&["--config", "surface-book-3.lidwake.toml", "match"]);
    assert_success(&output);
    assert!(stdout(&output).starts_with("Surface Book 3: lid \\_SB.LID0 on GPE 0x4d"));
}

#[test]
fn match_missing_sysfs_fails() {
    let output = lidwake(&["match", "--sysfs-root", "no-such-root"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No DMI information"));
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_full_cycle() {
    let root = fixtures().join("surface-pro-6");
    let output = lidwake(&["simulate", "--sysfs-root", root.to_str().unwrap()]);
    assert_success(&output);
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        [
            "Surface Pro 6 (lid \\_SB.LID0 on GPE 0x4f)",
            "init: ok",
            "  get_handle(\\_SB_.LID0)",
            "  mark_gpe_for_wake(0x4f)",
            "  enable_gpe(0x4f)",
            "  set_gpe_wake_mask(0x4f, disable)",
            "suspend: ok",
            "  set_gpe_wake_mask(0x4f, enable)",
            "resume: ok",
            "  set_gpe_wake_mask(0x4f, disable)",
            "exit: ok",
            "  set_gpe_wake_mask(0x4f, disable)",
            "  disable_gpe(0x4f)",
            "final: GPE 0x4f enable_count=0 wake=off (quiescent)",
        ]
    );
}

#[test]
fn simulate_init_failure_rolls_back() {
    let root = fixtures().join("surface-pro-6");
    let output = lidwake(&[
        "simulate",
        "--sysfs-root",
        root.to_str().unwrap(),
        "--fail",
        "set-wake-mask",
    ]);
    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("init: failed: failed to disable wakeup for GPE 0x4f: AE_ERROR"));
    assert!(out.contains("  disable_gpe(0x4f)"));
    assert!(!out.contains("suspend:"));
    assert!(out.contains("(quiescent)"));
    assert!(stderr(&output).contains("1 phase(s) failed"));
}

#[test]
fn simulate_suspend_failure_skips_resume() {
    let output = lidwake(&[
        "--config",
        "surface-book-3.lidwake.toml",
        "simulate",
        "--fail",
        "set-wake-mask",
        "--phase",
        "suspend",
    ]);
    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("suspend: failed: failed to enable wakeup for GPE 0x4d"));
    assert!(out.contains("resume: skipped"));
    assert!(out.contains("exit: ok"));
    assert!(out.contains("final: GPE 0x4d enable_count=0 wake=off (quiescent)"));
}

#[test]
fn simulate_unlisted_machine_is_a_no_op() {
    let root = fixtures().join("acme-widget");
    let output = lidwake(&["simulate", "--sysfs-root", root.to_str().unwrap()]);
    assert_success(&output);
    assert!(stdout(&output).contains("driver stays inactive"));
}

#[test]
fn unknown_failure_operation_is_rejected() {
    let output = lidwake(&["simulate", "--fail", "reboot"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown firmware operation 'reboot'"));
}

#[test]
fn phase_requires_fail() {
    let output = lidwake(&["simulate", "--phase", "resume"]);
    assert!(!output.status.success());
}
