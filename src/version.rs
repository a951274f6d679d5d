//! Build metadata embedded by `build.rs`.

use std::fmt;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version and git metadata of the running binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub branch: &'static str,
    pub sha: &'static str,
    pub dirty: bool,
}

impl BuildInfo {
    /// Metadata captured when this crate was compiled.
    pub const CURRENT: BuildInfo = BuildInfo {
        version: PKG_VERSION,
        branch: or_unknown(option_env!("VERGEN_GIT_BRANCH")),
        sha: or_unknown(option_env!("VERGEN_GIT_SHA")),
        dirty: is_true(option_env!("VERGEN_GIT_DIRTY")),
    };

    /// Short (7 character) commit hash.
    pub fn short_sha(&self) -> &'static str {
        let end = self.sha.len().min(7);
        self.sha.get(..end).unwrap_or(self.sha)
    }
}

const fn or_unknown(value: Option<&'static str>) -> &'static str {
    match value {
        Some(value) => value,
        None => "unknown",
    }
}

const fn is_true(value: Option<&'static str>) -> bool {
    match value {
        Some(value) => matches!(value.as_bytes(), b"true"),
        None => false,
    }
}

/// Renders `{version}+{branch}.{sha}`, with a `.dirty` suffix for
/// builds from a modified tree.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}.{}", self.version, self.branch, self.short_sha())?;
        if self.dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}

/// Version string of the running build, logged by the entry points at start.
pub fn version_string() -> String {
    BuildInfo::CURRENT.to_string()
}
