//! Embeds build metadata into the stepplay binary.
//!
//! Dev builds (the default) get `VERGEN_GIT_SHA` so `--version` can point
//! at the exact commit. Builds with the `release` feature skip the git
//! lookup and carry only `STEPPLAY_BUILD_DATE`.

use std::process::Command;

/// Build date as YYYY-MM-DD, or "unknown" where `date` is unavailable.
fn build_date() -> String {
    if let Ok(output) = Command::new("date").args(["+%Y-%m-%d"]).output() {
        if output.status.success() {
            return String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
    }
    "unknown".to_string()
}

fn main() {
    println!("cargo:rustc-env=STEPPLAY_BUILD_DATE={}", build_date());

    #[cfg(not(feature = "release"))]
    {
        use vergen_gitcl::{Emitter, GitclBuilder};

        let emitted = match GitclBuilder::default().sha(true).build() {
            Ok(git) => Emitter::default()
                .add_instructions(&git)
                .and_then(|emitter| emitter.emit()),
            Err(e) => {
                eprintln!("cargo:warning=git metadata unavailable: {}", e);
                println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
                return;
            }
        };

        // Outside a git checkout (source tarball, vendored build) there is
        // no SHA to embed; fall back rather than failing the build.
        if let Err(e) = emitted {
            eprintln!("cargo:warning=git metadata unavailable: {}", e);
            println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
        }
    }
}
