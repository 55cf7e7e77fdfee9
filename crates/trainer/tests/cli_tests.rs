//! CLI integration tests

use std::process::Command;
use std::time::{Duration, Instant};

fn iris_train() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_iris-train"));
    cmd.env_remove("IRIS_TRAIN_SEED");
    cmd
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = iris_train()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("--epochs"), "Should show epochs option");
    assert!(stdout.contains("--smoke-test"), "Should show smoke-test flag");
    assert!(stdout.contains("--seed"), "Should show seed option");
}

/// Smoke-test run: 1 epoch of 3 batches at 0.1s each
#[test]
fn test_smoke_test_single_epoch() {
    let start = Instant::now();
    let output = iris_train()
        .args(["--epochs", "1", "--smoke-test"])
        .output()
        .expect("Failed to execute command");
    let elapsed = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Smoke test should exit 0");
    assert!(stdout.contains("Mode: Smoke test"));
    assert!(stdout.contains("Epochs: 1"));
    assert!(stdout.contains("[Epoch 1] Batch 3/3 - Loss: "));
    assert!(!stdout.contains("Batch 4/"));
    assert!(stdout.contains("Epoch 1 complete"));
    assert!(stdout.contains("Training completed successfully!"));
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_secs(10));
}

/// Default epoch count is 2
#[test]
fn test_default_epochs() {
    let output = iris_train()
        .arg("--smoke-test")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Epochs: 2"));
    assert_eq!(stdout.matches("Batch ").count(), 6);
}

/// JSON output is parseable and reproducible for a fixed seed
#[test]
fn test_json_report_with_seed() {
    let run = || {
        let output = iris_train()
            .args(["--epochs", "2", "--smoke-test", "--seed", "7", "--format", "json"])
            .output()
            .expect("Failed to execute command");
        assert!(output.status.success());
        serde_json::from_slice::<serde_json::Value>(&output.stdout)
            .expect("stdout should hold only the JSON report")
    };

    let first = run();
    let second = run();

    assert_eq!(first["mode"], "Smoke test");
    assert_eq!(first["epochs"].as_array().unwrap().len(), 2);
    assert_eq!(first["epochs"], second["epochs"]);
}

/// Invalid arguments are rejected by the argument parser
#[test]
fn test_negative_epochs_rejected() {
    let output = iris_train()
        .args(["--epochs", "-1"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}
