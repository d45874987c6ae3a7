//! Volume control contract and platform adapters
//!
//! Defines the [`VolumeController`] trait all platform adapters
//! implement, the input validation every adapter applies before
//! spawning anything, and the factory that picks the adapter for a
//! detected platform:
//! - Linux: amixer (ALSA), falling back to pactl (PulseAudio)
//! - macOS: AppleScript `volume settings` via osascript
//! - Windows: Core Audio endpoint volume via an inline PowerShell wrapper

pub mod linux;
pub mod macos;
pub mod windows;

use crate::error::{Result, XvolError};
use crate::platform::Platform;
use crate::runner::ProcessRunner;
use std::sync::Arc;

/// Logical audio endpoints addressable through the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioDevice {
    /// Default playback device (speakers/headphones)
    Output,
    /// Default capture device (microphone)
    Input,
}

impl std::str::FromStr for AudioDevice {
    type Err = XvolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "output" => Ok(AudioDevice::Output),
            "input" => Ok(AudioDevice::Input),
            other => Err(XvolError::Validation(format!(
                "Audio device must be 'output' or 'input' (received: {})",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AudioDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioDevice::Output => write!(f, "output"),
            AudioDevice::Input => write!(f, "input"),
        }
    }
}

/// Volume and mute state of one device, as reported by an adapter.
///
/// The two are independent: a device can sit at volume 50 and be muted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Volume percentage in 0..=100
    pub level: u8,
    /// Whether the device is muted
    pub muted: bool,
}

/// Trait for platform volume control implementations
#[async_trait::async_trait]
pub trait VolumeController: Send + Sync {
    /// Current volume of `device` as a percentage in 0..=100.
    async fn get_volume(&self, device: AudioDevice) -> Result<u8>;

    /// Set the volume of `device` to `level` percent (0..=100).
    async fn set_volume(&self, device: AudioDevice, level: u8) -> Result<()>;

    /// Whether `device` is currently muted.
    async fn get_mute(&self, device: AudioDevice) -> Result<bool>;

    /// Mute or unmute `device`.
    async fn set_mute(&self, device: AudioDevice, muted: bool) -> Result<()>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Reject volume levels outside the 0..=100 contract range.
///
/// The unsigned integer type already rules out negatives and fractions,
/// so 101..=255 is the only runtime case. Called before any external
/// command is spawned.
pub(crate) fn validate_level(level: u8) -> Result<()> {
    if level > 100 {
        return Err(XvolError::Validation(format!(
            "Volume level must be between 0 and 100 (received: {})",
            level
        )));
    }
    Ok(())
}

/// Factory function that creates the adapter for `platform`.
pub fn create_controller(
    platform: Platform,
    runner: Arc<dyn ProcessRunner>,
) -> Box<dyn VolumeController> {
    let controller: Box<dyn VolumeController> = match platform {
        Platform::Windows => Box::new(windows::WindowsVolumeController::new(runner)),
        Platform::Macos => Box::new(macos::MacosVolumeController::new(runner)),
        Platform::Linux => Box::new(linux::LinuxVolumeController::new(runner)),
    };
    tracing::debug!("created volume controller: {}", controller.name());
    controller
}
