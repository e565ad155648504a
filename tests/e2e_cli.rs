//! End-to-end tests for the CLI binary.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

/// Write a config file pointing the tool registry at a stub ffmpeg and the
/// log file into the test's temp dir, keeping runs hermetic.
fn write_config(dir: &Path, stub_body: &str) -> std::path::PathBuf {
    let stub = common::write_stub(dir, stub_body);
    let config = serde_json::json!({
        "tools": { "ffmpeg_path": stub },
        "log": { "file": dir.join("vidmux.log") },
    });
    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

#[test]
fn invalid_path_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), common::STUB_OK);

    Command::cargo_bin("vidmux")
        .unwrap()
        .arg("/no/such/path")
        .args(["-f", "mp4", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("input not found"));
}

#[test]
fn check_tools_reports_ffmpeg() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), common::STUB_OK);

    Command::cargo_bin("vidmux")
        .unwrap()
        .arg("check-tools")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("ffmpeg"));
}

#[test]
fn empty_directory_batch_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), common::STUB_OK);
    let media = dir.path().join("media");
    std::fs::create_dir(&media).unwrap();

    Command::cargo_bin("vidmux")
        .unwrap()
        .arg(&media)
        .args(["-f", "mp4", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total files:  0"));
}

#[test]
fn batch_of_same_format_files_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), common::STUB_OK);
    let media = dir.path().join("media");
    std::fs::create_dir(&media).unwrap();
    std::fs::write(media.join("a.mp4"), b"a").unwrap();
    std::fs::write(media.join("b.mp4"), b"b").unwrap();

    Command::cargo_bin("vidmux")
        .unwrap()
        .arg(&media)
        .args(["-f", "mp4", "--max-workers", "2", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successful:   2"));
}

#[test]
fn batch_with_a_failure_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), common::STUB_FAIL);
    let media = dir.path().join("media");
    std::fs::create_dir(&media).unwrap();
    // The mp4 skips; the avi needs the always-failing tool.
    std::fs::write(media.join("a.mp4"), b"a").unwrap();
    std::fs::write(media.join("b.avi"), b"b").unwrap();

    Command::cargo_bin("vidmux")
        .unwrap()
        .arg(&media)
        .args(["-f", "mp4", "--no-parallel", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed:       1"))
        .stderr(predicate::str::contains("1 of 2 conversions failed"));
}

#[test]
fn single_file_conversion_failure_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), common::STUB_FAIL);
    let input = dir.path().join("movie.avi");
    std::fs::write(&input, b"data").unwrap();

    Command::cargo_bin("vidmux")
        .unwrap()
        .arg(&input)
        .args(["-f", "mp4", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("conversion failed"));
}

#[test]
fn single_file_skip_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), common::STUB_FAIL);
    let input = dir.path().join("clip.mp4");
    std::fs::write(&input, b"data").unwrap();

    // Already in the target format: succeeds without touching the tool.
    Command::cargo_bin("vidmux")
        .unwrap()
        .arg(&input)
        .args(["-f", "mp4", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("already in mp4 format"));
}

#[test]
fn unsupported_format_flag_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), common::STUB_OK);
    let input = dir.path().join("movie.avi");
    std::fs::write(&input, b"data").unwrap();

    Command::cargo_bin("vidmux")
        .unwrap()
        .arg(&input)
        .args(["-f", "xyz", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported target format"));
}
