//! Error types for xvol
//!
//! Uses thiserror for ergonomic error definitions with clear messages
//! that guide users toward fixing common issues. Every failure a caller
//! can see is one of the four `XvolError` variants; the failure of an
//! individual external command is carried separately as a
//! [`CommandError`] source so diagnostics survive the wrapping.

use crate::platform::Platform;
use thiserror::Error;

/// Top-level error type for the xvol crate
#[derive(Error, Debug)]
pub enum XvolError {
    /// The running operating system is not one of the supported platforms.
    #[error("Platform '{0}' is not supported. Supported platforms: windows, macos, linux")]
    UnsupportedPlatform(String),

    /// A required system utility is missing. Installing it requires a
    /// process restart to be picked up (probe results are cached).
    #[error("Required system utility '{dependency}' is not available. Install it to use xvol on this system.")]
    MissingDependency {
        dependency: String,
        platform: Platform,
    },

    /// Caller-supplied input failed contract validation. No external
    /// command has been run when this is returned.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An external command failed to spawn, exited non-zero, timed out,
    /// or produced output that could not be parsed.
    #[error("System command failed: {command}")]
    SystemCommand {
        command: String,
        platform: Platform,
        #[source]
        source: CommandError,
    },
}

impl XvolError {
    /// Wrap a runner failure with the command line that produced it.
    pub(crate) fn system(
        platform: Platform,
        command: impl Into<String>,
        source: CommandError,
    ) -> Self {
        XvolError::SystemCommand {
            command: command.into(),
            platform,
            source,
        }
    }
}

/// Failure modes of a single external command invocation
#[derive(Error, Debug)]
pub enum CommandError {
    /// Failed to spawn the process (typically: binary not in PATH)
    #[error("failed to spawn: {0}")]
    Spawn(#[source] std::io::Error),

    /// Failed while waiting for the process to exit
    #[error("failed to wait for command: {0}")]
    Wait(#[source] std::io::Error),

    /// The process did not exit within the timeout
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// The process exited with a non-zero status
    #[error("exited with code {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// The process succeeded but its output did not match the expected shape
    #[error("could not parse command output: {0}")]
    Parse(String),
}

/// Result type alias using XvolError
pub type Result<T> = std::result::Result<T, XvolError>;
