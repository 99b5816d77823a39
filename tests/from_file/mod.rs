//! Integration tests testing against the actual crate binary and reading from a file: Test the full E2E path.

use std::path::PathBuf;
use std::process::{Command, Output};

use movement_ingest::{IdWidth, derive_id};

fn run_binary(args: &[PathBuf]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_movement-ingest"))
        .args(args)
        .env_remove("ID_HEX_LEN")
        .env_remove("INGEST_WORKERS")
        .env_remove("INGEST_FAIL_FAST")
        .env_remove("LOG_FORMAT")
        .output()
        .expect("failed to execute binary")
}

#[test]
fn valid_lines_are_written_to_stdout() {
    let output = run_binary(&[fixture_path("movements.csv")]);

    assert!(
        output.status.success(),
        "binary exited with non-zero status.\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("binary output was not valid UTF-8");
    let expected = [
        "id,owner_ref,date,amount,processed".to_string(),
        format!("{},U1,2024-03-15,42.50,Ok", id("2024-03-15", "42.50", 1)),
        format!("{},U2,2024-03-16,-10.00,Ok", id("2024-03-16", "-10.00", 2)),
        format!("{},U6,2024-03-19,7,Ok", id("2024-03-19", "7", 7)),
    ];

    assert_eq!(stdout.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn unreadable_file_fails_the_run_after_processing_the_others() {
    let output = run_binary(&[
        fixture_path("does_not_exist.csv"),
        fixture_path("movements.csv"),
    ]);

    assert!(!output.status.success(), "missing file must fail the run");

    let stdout = String::from_utf8(output.stdout).expect("binary output was not valid UTF-8");
    assert_eq!(stdout.lines().count(), 4, "the readable file is still processed");
}

#[test]
fn no_arguments_is_a_usage_error() {
    let output = run_binary(&[]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

fn id(date: &str, amount: &str, ordinal: usize) -> String {
    derive_id(date, amount, ordinal, IdWidth::DEFAULT).to_string()
}

/// Returns the absolute path to a test fixture file in `tests/data/`.
fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}
