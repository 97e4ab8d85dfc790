//! Platform identification.
//!
//! Client configurations key their per-platform sections by OS identifier
//! (e.g. "linux") or OS+architecture composite (e.g. "linux-x86_64"). The
//! platform keys are author-supplied open strings, so os/arch are kept as
//! strings rather than closed enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A platform the process may be running on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system (darwin, linux, windows).
    pub os: String,
    /// Architecture (arm64, x86_64).
    pub arch: String,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Detect the platform of the running process.
    #[must_use]
    pub fn current() -> Self {
        let os = match std::env::consts::OS {
            "macos" => "darwin",
            other => other,
        };
        let arch = match std::env::consts::ARCH {
            "aarch64" => "arm64",
            other => other,
        };
        Self::new(os, arch)
    }

    /// The composite `os-arch` configuration key for this platform.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
