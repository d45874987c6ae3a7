//! Public dispatch layer
//!
//! Owns the three process-wide caches: the detected platform, the
//! dependency probe results, and the single adapter instance. The
//! module-level functions route every call through one shared
//! [`VolumeManager`] for the life of the process; construct a manager
//! directly to inject a custom runner or a known platform (tests do
//! this to avoid spawning real processes).
//!
//! Every operation follows the same short sequence: validate caller
//! input, detect the platform, gate on the platform's dependencies,
//! then hand off to the memoized adapter. Concurrent callers are not
//! serialized beyond that; two simultaneous writes to the same device
//! race at the OS level, which the OS mixers themselves permit.

use crate::controller::{create_controller, validate_level, AudioDevice, VolumeController, VolumeInfo};
use crate::deps::DependencyChecker;
use crate::error::Result;
use crate::platform::Platform;
use crate::runner::{ProcessRunner, SystemRunner};
use std::sync::{Arc, OnceLock};
use tokio::sync::OnceCell;

/// Dispatches volume operations to the adapter for the running platform.
pub struct VolumeManager {
    runner: Arc<dyn ProcessRunner>,
    platform: OnceLock<Platform>,
    deps: DependencyChecker,
    controller: OnceCell<Box<dyn VolumeController>>,
}

impl VolumeManager {
    /// Manager driving real external processes.
    pub fn new() -> Self {
        Self::with_runner(Arc::new(SystemRunner::new()))
    }

    /// Manager with an injected process runner.
    pub fn with_runner(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            deps: DependencyChecker::new(Arc::clone(&runner)),
            runner,
            platform: OnceLock::new(),
            controller: OnceCell::new(),
        }
    }

    /// Manager for a platform that is already known, skipping OS
    /// detection. Mainly useful to tests and embedders that pin the
    /// platform themselves.
    pub fn with_platform(platform: Platform, runner: Arc<dyn ProcessRunner>) -> Self {
        let manager = Self::with_runner(runner);
        let _ = manager.platform.set(platform);
        manager
    }

    /// Detected platform, memoized on first success. An unsupported
    /// host reports its error on every call instead of being cached.
    fn platform(&self) -> Result<Platform> {
        if let Some(&platform) = self.platform.get() {
            return Ok(platform);
        }
        let detected = Platform::detect()?;
        Ok(*self.platform.get_or_init(|| detected))
    }

    /// Dependency gate plus adapter lookup, shared by all operations.
    /// Adapter construction is atomic: concurrent first calls get the
    /// same instance.
    async fn dispatch(&self) -> Result<&dyn VolumeController> {
        let platform = self.platform()?;
        self.deps.validate(platform).await?;
        let controller = self
            .controller
            .get_or_init(|| async { create_controller(platform, Arc::clone(&self.runner)) })
            .await;
        Ok(controller.as_ref())
    }

    /// Current volume of `device`, 0..=100.
    pub async fn get_volume(&self, device: AudioDevice) -> Result<u8> {
        self.dispatch().await?.get_volume(device).await
    }

    /// Set the volume of `device` to `level` percent. Rejected input
    /// spawns nothing, not even a dependency probe.
    pub async fn set_volume(&self, device: AudioDevice, level: u8) -> Result<()> {
        validate_level(level)?;
        self.dispatch().await?.set_volume(device, level).await
    }

    /// Whether `device` is currently muted.
    pub async fn get_mute(&self, device: AudioDevice) -> Result<bool> {
        self.dispatch().await?.get_mute(device).await
    }

    /// Mute or unmute `device`.
    pub async fn set_mute(&self, device: AudioDevice, muted: bool) -> Result<()> {
        self.dispatch().await?.set_mute(device, muted).await
    }

    /// Volume and mute state of `device` in one call.
    pub async fn volume_info(&self, device: AudioDevice) -> Result<VolumeInfo> {
        let controller = self.dispatch().await?;
        Ok(VolumeInfo {
            level: controller.get_volume(device).await?,
            muted: controller.get_mute(device).await?,
        })
    }
}

impl Default for VolumeManager {
    fn default() -> Self {
        Self::new()
    }
}

static SHARED: OnceLock<VolumeManager> = OnceLock::new();

fn shared() -> &'static VolumeManager {
    SHARED.get_or_init(VolumeManager::new)
}

/// Current volume of the default `device`, 0..=100.
pub async fn get_volume(device: AudioDevice) -> Result<u8> {
    shared().get_volume(device).await
}

/// Set the volume of the default `device` to `level` percent.
pub async fn set_volume(device: AudioDevice, level: u8) -> Result<()> {
    shared().set_volume(device, level).await
}

/// Whether the default `device` is currently muted.
pub async fn get_mute(device: AudioDevice) -> Result<bool> {
    shared().get_mute(device).await
}

/// Mute or unmute the default `device`.
pub async fn set_mute(device: AudioDevice, muted: bool) -> Result<()> {
    shared().set_mute(device, muted).await
}

/// Volume and mute state of the default `device` in one call.
pub async fn volume_info(device: AudioDevice) -> Result<VolumeInfo> {
    shared().volume_info(device).await
}
