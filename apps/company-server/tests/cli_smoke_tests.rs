//! CLI smoke tests for company-server binary
//!
//! These tests verify that the CLI commands work correctly, including
//! configuration validation, help output, and a real request against a
//! server started on an in-memory database.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, Instant};

/// Helper to run the company-server binary with given arguments
fn run_company_server(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_company-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute company-server")
}

/// Write `body` under a `server.home_dir` pointing into `dir`, so that logs
/// and database files stay inside the temp dir.
fn write_config(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let home = dir.join("home").to_string_lossy().replace('\\', "/");
    let content = format!("server:\n  home_dir: \"{home}\"\n{body}");
    std::fs::write(&path, content).expect("Failed to write config file");
    path
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("Failed to find a free port")
}

/// Minimal HTTP/1.1 GET, returning the raw response text.
async fn http_get(port: u16, path: &str) -> std::io::Result<String> {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await?;
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await?;
    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}

#[test]
fn test_cli_help_command() {
    let output = run_company_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("company-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_company_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("company-server 0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_company_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the bad subcommand");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_company_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("config file not found"),
        "Should mention config file issue: {}",
        stderr
    );
}

#[test]
fn test_cli_config_flag_short_form() {
    let output = run_company_server(&["-c", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config file");
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_company_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to parse yaml config"),
        "Should mention YAML parsing issue: {}",
        stderr
    );
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "valid.yaml",
        r#"
database:
  url: "sqlite://database/companies.db"

logging:
  default:
    console_level: info
    file: "logs/company-server.log"
    file_level: info
    max_age_days: 28
    max_backups: 3
    max_size_mb: 1000

modules:
  companies:
    default_page_size: 5
    max_page_size: 20
"#,
    );

    let output = run_company_server(&["--config", config_path.to_str().unwrap(), "check"]);

    if !output.status.success() {
        eprintln!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success(), "Should succeed with valid config");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"));
}

#[test]
fn test_cli_check_rejects_unknown_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "pg.yaml",
        r#"
database:
  url: "postgresql://localhost/nonexistent"
"#,
    );

    let output = run_company_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported database type"), "{}", stderr);

    // --mock swaps in the in-memory database
    let output =
        run_company_server(&["--config", config_path.to_str().unwrap(), "--mock", "check"]);
    assert!(
        output.status.success(),
        "Should succeed with mock database: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_cli_check_rejects_bad_module_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "module.yaml",
        r#"
modules:
  companies:
    page_size: 5
"#,
    );

    let output = run_company_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("companies"), "{}", stderr);
}

#[test]
fn test_cli_print_config_applies_overrides() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "print.yaml", "");

    let output = run_company_server(&[
        "--config",
        config_path.to_str().unwrap(),
        "--port",
        "9191",
        "--mock",
        "--print-config",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9191"), "{}", stdout);
    assert!(stdout.contains("sqlite::memory:"), "{}", stdout);
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_company_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Start the server"));

    let output = run_company_server(&["check", "--help"]);
    assert!(output.status.success(), "Check subcommand help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Check configuration"));
}

#[tokio::test]
async fn test_cli_run_serves_seeded_companies() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "run.yaml",
        r#"
modules:
  companies:
    seed_demo_data: true
"#,
    );
    let port = free_port();

    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_company-server"))
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "--mock",
            "--port",
            &port.to_string(),
            "run",
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to start company-server");

    let deadline = Instant::now() + Duration::from_secs(20);
    let response = loop {
        match http_get(port, "/api/companies?pageSize=1").await {
            Ok(resp) => break resp,
            Err(_) if Instant::now() < deadline => sleep(Duration::from_millis(100)).await,
            Err(e) => panic!("Server did not come up: {e}"),
        }
    };
    child.kill().await.ok();

    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.to_ascii_lowercase().contains("x-pagination:"), "{}", response);
    assert!(response.contains("Admin_Solutions Ltd"), "{}", response);
}
