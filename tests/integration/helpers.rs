//! Shared helpers for integration tests

use assert_cmd::Command;

/// Command for the stepplay binary with a quiet, color-free environment.
pub fn stepplay() -> Command {
    let mut cmd = Command::cargo_bin("stepplay").expect("binary builds");
    cmd.env("NO_COLOR", "1");
    cmd
}
