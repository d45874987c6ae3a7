//! xvol: volume and mute control for the default audio devices
//!
//! This library reads and sets the volume level and mute state of the
//! default audio output (speaker) and input (microphone) device on
//! Windows, macOS, and Linux, normalizing each platform's native
//! mechanism into one small contract:
//! - Linux: amixer (ALSA), falling back to pactl (PulseAudio)
//! - macOS: AppleScript `volume settings` via osascript
//! - Windows: Core Audio endpoint volume via an inline PowerShell wrapper
//!
//! # Architecture
//!
//! ```text
//!  caller ──▶ VolumeManager ──▶ DependencyChecker (gate)
//!                  │
//!                  ▼
//!          VolumeController  (one adapter per process)
//!        ┌─────────┼──────────┐
//!        ▼         ▼          ▼
//!      Linux     macOS     Windows
//!     amixer/  osascript  powershell
//!      pactl
//!        │         │          │
//!        └─────────┴──────────┘
//!                  ▼
//!            ProcessRunner ──▶ OS audio subsystem
//! ```
//!
//! Platform detection, dependency probes, and the adapter instance are
//! each computed once and reused for the life of the process.
//!
//! # Example
//!
//! ```no_run
//! use xvol::AudioDevice;
//!
//! # async fn demo() -> xvol::Result<()> {
//! xvol::set_volume(AudioDevice::Output, 40).await?;
//! let level = xvol::get_volume(AudioDevice::Output).await?;
//! assert_eq!(level, 40);
//!
//! xvol::set_mute(AudioDevice::Input, true).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod controller;
pub mod deps;
pub mod error;
pub mod manager;
pub mod platform;
pub mod runner;

pub use controller::{AudioDevice, VolumeController, VolumeInfo};
pub use error::{CommandError, Result, XvolError};
pub use manager::{get_mute, get_volume, set_mute, set_volume, volume_info, VolumeManager};
pub use platform::Platform;
pub use runner::{ProcessRunner, SystemRunner};
