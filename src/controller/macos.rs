//! macOS adapter: AppleScript volume settings via osascript
//!
//! All reads go through a single `get volume settings` query, which
//! answers with a structured line like:
//!
//! ```text
//! output volume:64, input volume:90, alert volume:100, output muted:false
//! ```
//!
//! Writes use the `set volume ...` forms. AppleScript exposes no input
//! mute at all: reading it always reports unmuted and writing it is a
//! warned no-op. That asymmetry is a platform limitation, not a bug.

use super::{validate_level, AudioDevice, VolumeController};
use crate::error::{CommandError, Result, XvolError};
use crate::platform::Platform;
use crate::runner::ProcessRunner;
use regex::Regex;
use std::sync::{Arc, OnceLock};

const VOLUME_SETTINGS: &str = "get volume settings";

/// Volume control via the macOS scripting host
pub struct MacosVolumeController {
    runner: Arc<dyn ProcessRunner>,
}

impl MacosVolumeController {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    async fn run_script(&self, script: &str) -> Result<String> {
        self.runner
            .run("osascript", &["-e", script])
            .await
            .map_err(|source| {
                XvolError::system(Platform::Macos, format!("osascript -e \"{}\"", script), source)
            })
    }

    fn parse_error(script: &str, what: &str) -> XvolError {
        XvolError::system(
            Platform::Macos,
            format!("osascript -e \"{}\"", script),
            CommandError::Parse(format!("could not parse {} from volume settings", what)),
        )
    }
}

/// Pull the `output volume:NN` / `input volume:NN` field for `device`
/// out of `get volume settings` output. Matched digits that overflow an
/// integer count as 0; the result is clamped into 0..=100.
fn parse_volume_field(output: &str, device: AudioDevice) -> Option<u8> {
    static OUTPUT_RE: OnceLock<Regex> = OnceLock::new();
    static INPUT_RE: OnceLock<Regex> = OnceLock::new();

    let re = match device {
        AudioDevice::Output => OUTPUT_RE.get_or_init(|| Regex::new(r"output volume:(\d+)").unwrap()),
        AudioDevice::Input => INPUT_RE.get_or_init(|| Regex::new(r"input volume:(\d+)").unwrap()),
    };

    let digits = re.captures(output)?.get(1)?.as_str();
    Some(digits.parse::<i64>().unwrap_or(0).clamp(0, 100) as u8)
}

/// Pull the `output muted:true|false` field out of `get volume settings`
/// output.
fn parse_output_muted(output: &str) -> Option<bool> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"output muted:(true|false)").unwrap());
    Some(re.captures(output)?.get(1)?.as_str() == "true")
}

#[async_trait::async_trait]
impl VolumeController for MacosVolumeController {
    async fn get_volume(&self, device: AudioDevice) -> Result<u8> {
        let output = self.run_script(VOLUME_SETTINGS).await?;
        parse_volume_field(&output, device).ok_or_else(|| {
            Self::parse_error(VOLUME_SETTINGS, match device {
                AudioDevice::Output => "output volume",
                AudioDevice::Input => "input volume",
            })
        })
    }

    async fn set_volume(&self, device: AudioDevice, level: u8) -> Result<()> {
        validate_level(level)?;
        let script = match device {
            AudioDevice::Output => format!("set volume output volume {}", level),
            AudioDevice::Input => format!("set volume input volume {}", level),
        };
        self.run_script(&script).await?;
        Ok(())
    }

    async fn get_mute(&self, device: AudioDevice) -> Result<bool> {
        match device {
            AudioDevice::Output => {
                let output = self.run_script(VOLUME_SETTINGS).await?;
                parse_output_muted(&output)
                    .ok_or_else(|| Self::parse_error(VOLUME_SETTINGS, "output mute state"))
            }
            // AppleScript has no input mute query; the device always
            // reads as unmuted.
            AudioDevice::Input => Ok(false),
        }
    }

    async fn set_mute(&self, device: AudioDevice, muted: bool) -> Result<()> {
        match device {
            AudioDevice::Output => {
                let script = if muted {
                    "set volume with output muted"
                } else {
                    "set volume without output muted"
                };
                self.run_script(script).await?;
                Ok(())
            }
            AudioDevice::Input => {
                // No AppleScript control exists for input mute. Succeed
                // so the contract stays uniform across devices.
                tracing::warn!("setting input mute is not supported on macOS through AppleScript");
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "macos (osascript)"
    }
}
