#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for calculator-server binary
//!
//! These tests verify that the CLI commands work correctly, including
//! configuration layering, validation, and startup failures.

use std::io::Write;
use std::process::{Command, Stdio};

/// Helper to run the calculator-server binary with given arguments
fn run_calculator_server(args: &[&str], envs: &[(&str, &str)]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_calculator-server"))
        .args(args)
        .env_remove("CALC__SERVER__LISTEN_ADDR")
        .env_remove("RUST_LOG")
        .envs(envs.iter().copied())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute calculator-server")
}

#[test]
fn test_cli_help_command() {
    let output = run_calculator_server(&["--help"], &[]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("calculator-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--listen"), "Should mention listen option");
}

#[test]
fn test_cli_version_command() {
    let output = run_calculator_server(&["--version"], &[]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("calculator-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_calculator_server(&["invalid-command"], &[]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "{stderr}");
}

#[test]
fn test_cli_missing_config_file() {
    let output = run_calculator_server(&["--config", "/nonexistent/config.yaml", "check"], &[]);

    assert!(
        !output.status.success(),
        "Should fail when config file doesn't exist"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "{stderr}");
}

#[test]
fn test_print_config_defaults() {
    let output = run_calculator_server(&["--print-config"], &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"listen_addr\": \"0.0.0.0:50051\""), "{stdout}");
}

#[test]
fn test_print_config_layering() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "server:\n  listen_addr: \"127.0.0.1:7000\"\nlogging:\n  level: warn").unwrap();
    let path = file.path().to_str().unwrap();

    let from_yaml = run_calculator_server(&["--config", path, "--print-config"], &[]);
    let stdout = String::from_utf8_lossy(&from_yaml.stdout);
    assert!(stdout.contains("127.0.0.1:7000"), "{stdout}");
    assert!(stdout.contains("\"level\": \"warn\""), "{stdout}");

    let from_env = run_calculator_server(
        &["--config", path, "--print-config"],
        &[("CALC__SERVER__LISTEN_ADDR", "127.0.0.1:7001")],
    );
    let stdout = String::from_utf8_lossy(&from_env.stdout);
    assert!(stdout.contains("127.0.0.1:7001"), "{stdout}");

    let from_cli = run_calculator_server(
        &["--config", path, "--listen", "127.0.0.1:7002", "-vv", "--print-config"],
        &[("CALC__SERVER__LISTEN_ADDR", "127.0.0.1:7001")],
    );
    let stdout = String::from_utf8_lossy(&from_cli.stdout);
    assert!(stdout.contains("127.0.0.1:7002"), "{stdout}");
    assert!(stdout.contains("\"level\": \"debug\""), "{stdout}");
}

#[test]
fn test_check_rejects_bad_listen_addr() {
    let output = run_calculator_server(&["--listen", "not-an-address", "check"], &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not-an-address"), "{stderr}");
}

#[test]
fn test_check_accepts_valid_config() {
    let output = run_calculator_server(&["--listen", "127.0.0.1:0", "check"], &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"), "{stdout}");
}

#[test]
fn test_run_fails_when_port_is_taken() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = taken.local_addr().unwrap().to_string();

    let output = run_calculator_server(&["--listen", &addr, "run"], &[]);

    assert!(!output.status.success(), "bind failure should exit non-zero");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to bind"), "{stderr}");
}
