//! Version string composition from build-time metadata.
//!
//! `build.rs` embeds the build date and, for dev builds, the current git
//! SHA. Official builds (the `release` feature) get a clean string without
//! the hash.

use std::sync::OnceLock;

/// Full version string for `--version` output.
///
/// Dev builds look like `0.2.0 (abc1234, built 2025-03-14)`; release builds
/// collapse to `0.2.0 (built 2025-03-14)`. Composed once and cached, since
/// clap wants a `&'static str`.
pub fn long_version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        let version = env!("CARGO_PKG_VERSION");
        let date = env!("STEPPLAY_BUILD_DATE");

        match option_env!("VERGEN_GIT_SHA") {
            Some(sha) if sha != "unknown" => format!("{} ({}, built {})", version, sha, date),
            _ => format!("{} (built {})", version, date),
        }
    })
}
