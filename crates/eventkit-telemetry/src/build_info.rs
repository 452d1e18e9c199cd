//! Build metadata attached to dispatcher log records.

use serde::Serialize;

/// Name, version and commit of the crate that emitted a log record.
///
/// `commit` is read from the `EVENTKIT_COMMIT` environment variable at
/// compile time and is `"unknown"` when it was not set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    /// Package name.
    pub package: &'static str,
    /// Package version.
    pub version: &'static str,
    /// Source commit.
    pub commit: &'static str,
}

impl BuildInfo {
    /// Build metadata of the `eventkit` crates.
    #[must_use]
    pub const fn current() -> Self {
        Self {
            package: "eventkit",
            version: env!("CARGO_PKG_VERSION"),
            commit: match option_env!("EVENTKIT_COMMIT") {
                Some(commit) => commit,
                None => "unknown",
            },
        }
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.package, self.version, self.commit)
    }
}
