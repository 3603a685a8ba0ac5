//! Integration tests for the stepplay CLI
//!
//! Everything here runs with stdout piped, so the binary can never get
//! past its terminal check. That is deliberate: these tests cover argument
//! handling and the failure paths that must work before any terminal or
//! decoder state exists.

use predicates::prelude::*;

use crate::helpers::stepplay;

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn help_exits_0_and_shows_usage() {
    stepplay()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Step-by-step video review"))
        .stdout(predicate::str::contains("<VIDEO>"))
        .stdout(predicate::str::contains("--record"));
}

#[test]
fn long_help_explains_the_session_flow() {
    stepplay()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Space marks"));
}

#[test]
fn version_carries_package_version_and_build_date() {
    stepplay()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("built"));
}

// ============================================================================
// Argument Errors
// ============================================================================

#[test]
fn no_arguments_is_a_usage_error() {
    stepplay()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("<VIDEO>"));
}

#[test]
fn missing_video_file_fails_with_the_path_in_the_message() {
    stepplay()
        .arg("no-such-demo.mp4")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no-such-demo.mp4"));
}

#[test]
fn record_and_data_dir_flags_parse() {
    // Still dies on the missing file, but past argument parsing.
    stepplay()
        .args(["-r", "--data-dir", "/tmp/stepplay-it", "no-such-demo.mp4"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unexpected argument").not());
}

// ============================================================================
// Terminal Requirement
// ============================================================================

#[test]
fn refuses_to_draw_outside_a_terminal() {
    // An existing file gets past path resolution and must then stop at the
    // terminal check, before the config, store, or ffmpeg are touched.
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("clip.mp4");
    std::fs::write(&video, b"not a real video").unwrap();

    stepplay()
        .arg(&video)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("run it interactively"));
}
