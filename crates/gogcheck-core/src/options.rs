//! Run-wide options threaded explicitly through the pipeline (no globals).

use std::fmt;
use std::str::FromStr;

/// Platform a build was published for. It selects the remote builds listing
/// and decides which path grammar the depot paths were authored under; it is
/// never inferred from the host OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Osx,
}

impl Platform {
    /// Tag used in content-system URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Osx => "osx",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "windows" => Ok(Platform::Windows),
            "osx" => Ok(Platform::Osx),
            other => Err(format!("unknown platform {other:?} (expected \"windows\" or \"osx\")")),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::parse(s)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable per-run options resolved from CLI flags and config defaults.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Suppress all console output. Never changes the exit status.
    pub quiet: bool,
    /// Platform of the installation being checked.
    pub platform: Platform,
    /// Language filter; `"*"` matches every depot.
    pub language: String,
}
