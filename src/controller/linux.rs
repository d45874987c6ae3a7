//! Linux adapter: amixer (ALSA) with pactl (PulseAudio) fallback
//!
//! The backend is chosen once per adapter instance: `amixer --version`
//! first, then `pactl --version`. A successful choice is cached for the
//! life of the instance, so a mixer tool installed later is not picked
//! up until the process restarts.
//!
//! amixer addresses the `Master` (output) and `Capture` (input) simple
//! controls; pactl addresses the `@DEFAULT_SINK@` and `@DEFAULT_SOURCE@`
//! endpoints. Both report volume as a percentage somewhere in their
//! output, which is scraped by the parse helpers below.

use super::{validate_level, AudioDevice, VolumeController};
use crate::error::{CommandError, Result, XvolError};
use crate::platform::Platform;
use crate::runner::{command_line, ProcessRunner};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tokio::sync::OnceCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Amixer,
    Pactl,
}

/// Volume control via the ALSA/PulseAudio command-line tools
pub struct LinuxVolumeController {
    runner: Arc<dyn ProcessRunner>,
    backend: OnceCell<Backend>,
}

impl LinuxVolumeController {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            backend: OnceCell::new(),
        }
    }

    /// amixer if present, otherwise pactl. Probed once; a failed probe
    /// round is retried on the next call rather than cached.
    async fn backend(&self) -> Result<Backend> {
        self.backend
            .get_or_try_init(|| async {
                if self.runner.run("amixer", &["--version"]).await.is_ok() {
                    tracing::debug!("using amixer backend");
                    return Ok(Backend::Amixer);
                }
                if self.runner.run("pactl", &["--version"]).await.is_ok() {
                    tracing::debug!("using pactl backend");
                    return Ok(Backend::Pactl);
                }
                Err(XvolError::MissingDependency {
                    dependency: "amixer or pactl".to_string(),
                    platform: Platform::Linux,
                })
            })
            .await
            .copied()
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        self.runner
            .run(program, args)
            .await
            .map_err(|source| XvolError::system(Platform::Linux, command_line(program, args), source))
    }

    fn parse_error(program: &str, args: &[&str], what: &str, device: AudioDevice) -> XvolError {
        XvolError::system(
            Platform::Linux,
            command_line(program, args),
            CommandError::Parse(format!("no {} for {} in {} output", what, device, program)),
        )
    }

    fn amixer_control(device: AudioDevice) -> &'static str {
        match device {
            AudioDevice::Output => "Master",
            AudioDevice::Input => "Capture",
        }
    }

    fn pactl_target(device: AudioDevice) -> &'static str {
        match device {
            AudioDevice::Output => "@DEFAULT_SINK@",
            AudioDevice::Input => "@DEFAULT_SOURCE@",
        }
    }
}

/// Extract the `[NN%]` volume field from `amixer get` output.
fn parse_amixer_volume(output: &str) -> Option<u8> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\[(\d+)%\]").unwrap());
    let percent: u16 = re.captures(output)?.get(1)?.as_str().parse().ok()?;
    Some(percent.min(100) as u8)
}

/// Extract the first `NN%` occurrence from pactl volume output. pactl
/// can report boosted volumes above 100%, which are clamped back into
/// the contract range.
fn parse_pactl_volume(output: &str) -> Option<u8> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(\d+)%").unwrap());
    let percent: u16 = re.captures(output)?.get(1)?.as_str().parse().ok()?;
    Some(percent.min(100) as u8)
}

#[async_trait::async_trait]
impl VolumeController for LinuxVolumeController {
    async fn get_volume(&self, device: AudioDevice) -> Result<u8> {
        match self.backend().await? {
            Backend::Amixer => {
                let args = ["get", Self::amixer_control(device)];
                let output = self.run("amixer", &args).await?;
                parse_amixer_volume(&output)
                    .ok_or_else(|| Self::parse_error("amixer", &args, "volume field", device))
            }
            Backend::Pactl => {
                let subcommand = match device {
                    AudioDevice::Output => "get-sink-volume",
                    AudioDevice::Input => "get-source-volume",
                };
                let args = [subcommand, Self::pactl_target(device)];
                let output = self.run("pactl", &args).await?;
                parse_pactl_volume(&output)
                    .ok_or_else(|| Self::parse_error("pactl", &args, "volume percentage", device))
            }
        }
    }

    async fn set_volume(&self, device: AudioDevice, level: u8) -> Result<()> {
        validate_level(level)?;
        let level_arg = format!("{}%", level);

        match self.backend().await? {
            Backend::Amixer => {
                self.run("amixer", &["set", Self::amixer_control(device), &level_arg])
                    .await?;
            }
            Backend::Pactl => {
                let subcommand = match device {
                    AudioDevice::Output => "set-sink-volume",
                    AudioDevice::Input => "set-source-volume",
                };
                self.run("pactl", &[subcommand, Self::pactl_target(device), &level_arg])
                    .await?;
            }
        }
        Ok(())
    }

    async fn get_mute(&self, device: AudioDevice) -> Result<bool> {
        match self.backend().await? {
            Backend::Amixer => {
                let output = self
                    .run("amixer", &["get", Self::amixer_control(device)])
                    .await?;
                Ok(output.contains("[off]"))
            }
            Backend::Pactl => {
                let subcommand = match device {
                    AudioDevice::Output => "get-sink-mute",
                    AudioDevice::Input => "get-source-mute",
                };
                let output = self
                    .run("pactl", &[subcommand, Self::pactl_target(device)])
                    .await?;
                Ok(output.contains("yes"))
            }
        }
    }

    async fn set_mute(&self, device: AudioDevice, muted: bool) -> Result<()> {
        match self.backend().await? {
            Backend::Amixer => {
                let action = if muted { "mute" } else { "unmute" };
                self.run("amixer", &["set", Self::amixer_control(device), action])
                    .await?;
            }
            Backend::Pactl => {
                let subcommand = match device {
                    AudioDevice::Output => "set-sink-mute",
                    AudioDevice::Input => "set-source-mute",
                };
                let flag = if muted { "1" } else { "0" };
                self.run("pactl", &[subcommand, Self::pactl_target(device), flag])
                    .await?;
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "linux (amixer/pactl)"
    }
}
