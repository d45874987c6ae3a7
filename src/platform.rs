//! Platform detection
//!
//! Maps the running operating system to one of the three platforms xvol
//! can drive. The mapping itself is a pure function so tests can feed it
//! arbitrary identifiers; memoization of the detected value belongs to
//! [`crate::manager::VolumeManager`], which only caches successes: an
//! unsupported host reports its error on every call instead of
//! poisoning the cache.

use crate::error::{Result, XvolError};

/// Operating systems supported by xvol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Macos,
    Linux,
}

impl Platform {
    /// Detect the platform this process is running on.
    pub fn detect() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as reported by `std::env::consts::OS`)
    /// to a supported platform.
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "windows" => Ok(Platform::Windows),
            "macos" => Ok(Platform::Macos),
            "linux" => Ok(Platform::Linux),
            other => Err(XvolError::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Macos => write!(f, "macos"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}
