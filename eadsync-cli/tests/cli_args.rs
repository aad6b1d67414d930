//! Argument and job-file handling for the `eadsync` binary.
//!
//! Network-facing behavior lives behind the pipeline's repository traits
//! and is covered in eadsync-pipeline; these tests exercise the binary
//! surface: flag parsing, job-file validation, and startup failure paths.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn eadsync() -> Command {
    Command::cargo_bin("eadsync").expect("binary built")
}

fn write_job(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("job.yaml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn run_requires_a_job_file_argument() {
    eadsync()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--job"));
}

#[test]
fn missing_job_file_fails_with_its_path() {
    eadsync()
        .args(["run", "--job", "/definitely/not/here.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load job file"));
}

#[test]
fn invalid_id_generator_is_rejected_before_any_connection() {
    let dir = TempDir::new().unwrap();
    let job = write_job(&dir, "source_url: http://127.0.0.1:1\n");
    eadsync()
        .args(["run", "--job"])
        .arg(&job)
        .args(["--id-generator", "clever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown id generator 'clever'"));
}

#[test]
fn job_without_repo_target_fails_validation() {
    let dir = TempDir::new().unwrap();
    let job = write_job(
        &dir,
        "\
source_url: http://127.0.0.1:1
source_username: admin
source_password: pw
source_repo_id: 2
destination_url: http://127.0.0.1:1
destination_username: admin
destination_password: pw
",
    );
    eadsync()
        .args(["check", "--job"])
        .arg(&job)
        .assert()
        .failure()
        .stderr(predicate::str::contains("destination_repo_id"));
}

#[test]
fn unreachable_source_fails_the_check() {
    let dir = TempDir::new().unwrap();
    // Port 1 is never listening; the session open fails at login.
    let job = write_job(
        &dir,
        "\
source_url: http://127.0.0.1:1
source_username: admin
source_password: pw
source_repo_id: 2
destination_url: http://127.0.0.1:1
destination_username: admin
destination_password: pw
destination_repo_id: 3
",
    );
    eadsync()
        .args(["check", "--job"])
        .arg(&job)
        .assert()
        .failure()
        .stderr(predicate::str::contains("source verification failed"));
}

#[test]
fn help_lists_both_subcommands() {
    eadsync()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run").and(predicate::str::contains("check")));
}
