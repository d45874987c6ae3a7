//! Dependency probing and validation
//!
//! Each platform drives its audio subsystem through an external utility
//! that may not be installed. Before any operation runs, the dispatcher
//! asks this module whether the detected platform's requirements are
//! met. Probes are performed by a minimal invocation of the utility and
//! the boolean result is cached for the life of the process: a utility
//! installed after a failed probe is not picked up until restart.

use crate::error::{Result, XvolError};
use crate::platform::Platform;
use crate::runner::ProcessRunner;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Probes external utilities and remembers the result per command name.
pub struct DependencyChecker {
    runner: Arc<dyn ProcessRunner>,
    probed: Mutex<HashMap<String, bool>>,
}

impl DependencyChecker {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            probed: Mutex::new(HashMap::new()),
        }
    }

    /// Minimal invocation used to probe a command.
    ///
    /// `--version` works for the ALSA/PulseAudio tools; osascript and
    /// powershell have no useful `--version` and get trivial scripts
    /// instead.
    fn probe_args(command: &str) -> &'static [&'static str] {
        match command {
            "osascript" => &["-e", "return 1"],
            "powershell" => &["-Command", "$PSVersionTable.PSVersion"],
            _ => &["--version"],
        }
    }

    /// Check whether `command` can be invoked. Any failure (missing
    /// binary, non-zero exit, timeout) counts as unavailable; this never
    /// returns an error.
    pub async fn check(&self, command: &str) -> bool {
        if let Some(&available) = self.probed.lock().unwrap().get(command) {
            return available;
        }

        let available = self
            .runner
            .run(command, Self::probe_args(command))
            .await
            .is_ok();

        if !available {
            tracing::debug!("dependency probe failed for '{}'", command);
        }

        self.probed
            .lock()
            .unwrap()
            .insert(command.to_string(), available);
        available
    }

    /// Fail fast when the detected platform's required utilities are
    /// absent. O(1) after the first probe of each command.
    pub async fn validate(&self, platform: Platform) -> Result<()> {
        match platform {
            Platform::Windows => {
                if !self.check("powershell").await {
                    return Err(XvolError::MissingDependency {
                        dependency: "powershell".to_string(),
                        platform,
                    });
                }
            }
            Platform::Macos => {
                if !self.check("osascript").await {
                    return Err(XvolError::MissingDependency {
                        dependency: "osascript".to_string(),
                        platform,
                    });
                }
            }
            Platform::Linux => {
                let has_amixer = self.check("amixer").await;
                let has_pactl = self.check("pactl").await;
                if !has_amixer && !has_pactl {
                    return Err(XvolError::MissingDependency {
                        dependency: "amixer or pactl".to_string(),
                        platform,
                    });
                }
            }
        }
        Ok(())
    }
}
