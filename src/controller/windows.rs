//! Windows adapter: Core Audio endpoint volume via an inline PowerShell wrapper
//!
//! Each operation spawns `powershell` with a script that compiles a
//! small C# COM wrapper (`Add-Type`) exposing the default render and
//! capture endpoints' scalar volume (0.0–1.0) and mute through
//! `IAudioEndpointVolume`, then runs a one-line accessor against it.
//! No native handle survives between calls, so every operation costs
//! one process spawn plus COM activation.

use super::{validate_level, AudioDevice, VolumeController};
use crate::error::{CommandError, Result, XvolError};
use crate::platform::Platform;
use crate::runner::ProcessRunner;
use std::sync::Arc;

/// C# wrapper over the default render/capture endpoints, compiled into
/// the PowerShell session on every invocation. `Audio` is the render
/// (output) endpoint, `AudioInput` the capture (input) endpoint.
const AUDIO_WRAPPER: &str = r#"Add-Type -TypeDefinition @'
using System;
using System.Runtime.InteropServices;
[Guid("5CDF2C82-841E-4546-9722-0CF74078229A"), InterfaceType(ComInterfaceType.InterfaceIsIUnknown)]
interface IAudioEndpointVolume {
    int RegisterControlChangeNotify(IntPtr pNotify);
    int UnregisterControlChangeNotify(IntPtr pNotify);
    int GetChannelCount(out uint pnChannelCount);
    int SetMasterVolumeLevel(float fLevelDB, Guid pguidEventContext);
    int SetMasterVolumeLevelScalar(float fLevel, Guid pguidEventContext);
    int GetMasterVolumeLevel(out float pfLevelDB);
    int GetMasterVolumeLevelScalar(out float pfLevel);
    int SetChannelVolumeLevel(uint nChannel, float fLevelDB, Guid pguidEventContext);
    int SetChannelVolumeLevelScalar(uint nChannel, float fLevel, Guid pguidEventContext);
    int GetChannelVolumeLevel(uint nChannel, out float pfLevelDB);
    int GetChannelVolumeLevelScalar(uint nChannel, out float pfLevel);
    int SetMute(bool bMute, Guid pguidEventContext);
    int GetMute(out bool pbMute);
    int GetVolumeStepInfo(out uint pnStep, out uint pnStepCount);
    int VolumeStepUp(Guid pguidEventContext);
    int VolumeStepDown(Guid pguidEventContext);
    int QueryHardwareSupport(out uint pdwHardwareSupportMask);
    int GetVolumeRange(out float pflVolumeMindB, out float pflVolumeMaxdB, out float pflVolumeIncrementdB);
}
[Guid("D666063F-1587-4E43-81F1-B948E807363F"), InterfaceType(ComInterfaceType.InterfaceIsIUnknown)]
interface IMMDevice {
    int Activate(ref Guid id, uint dwClsCtx, IntPtr pActivationParams, [MarshalAs(UnmanagedType.IUnknown)] out object ppInterface);
}
[Guid("A95664D2-9614-4F35-A746-DE8DB63617E6"), InterfaceType(ComInterfaceType.InterfaceIsIUnknown)]
interface IMMDeviceEnumerator {
    int EnumAudioEndpoints(int dataFlow, int dwStateMask, out IntPtr ppDevices);
    int GetDefaultAudioEndpoint(int dataFlow, int role, out IMMDevice ppEndpoint);
}
[ComImport, Guid("BCDE0395-E52F-467C-8E3D-C4579291692E")]
class MMDeviceEnumerator { }
public class Audio {
    static IAudioEndpointVolume Vol() {
        var deviceEnumerator = (IMMDeviceEnumerator)(new MMDeviceEnumerator());
        IMMDevice speakers;
        deviceEnumerator.GetDefaultAudioEndpoint(0, 0, out speakers);
        Guid IID_IAudioEndpointVolume = typeof(IAudioEndpointVolume).GUID;
        object o;
        speakers.Activate(ref IID_IAudioEndpointVolume, 0, IntPtr.Zero, out o);
        return (IAudioEndpointVolume)o;
    }
    public static float Volume {
        get { float v; Vol().GetMasterVolumeLevelScalar(out v); return v; }
        set { Vol().SetMasterVolumeLevelScalar(value, Guid.Empty); }
    }
    public static bool Mute {
        get { bool mute; Vol().GetMute(out mute); return mute; }
        set { Vol().SetMute(value, Guid.Empty); }
    }
}
public class AudioInput {
    static IAudioEndpointVolume Vol() {
        var deviceEnumerator = (IMMDeviceEnumerator)(new MMDeviceEnumerator());
        IMMDevice microphone;
        deviceEnumerator.GetDefaultAudioEndpoint(1, 0, out microphone);
        Guid IID_IAudioEndpointVolume = typeof(IAudioEndpointVolume).GUID;
        object o;
        microphone.Activate(ref IID_IAudioEndpointVolume, 0, IntPtr.Zero, out o);
        return (IAudioEndpointVolume)o;
    }
    public static float Volume {
        get { float v; Vol().GetMasterVolumeLevelScalar(out v); return v; }
        set { Vol().SetMasterVolumeLevelScalar(value, Guid.Empty); }
    }
    public static bool Mute {
        get { bool mute; Vol().GetMute(out mute); return mute; }
        set { Vol().SetMute(value, Guid.Empty); }
    }
}
'@"#;

/// Volume control via the Windows scripting host
pub struct WindowsVolumeController {
    runner: Arc<dyn ProcessRunner>,
}

impl WindowsVolumeController {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    fn class_name(device: AudioDevice) -> &'static str {
        match device {
            AudioDevice::Output => "Audio",
            AudioDevice::Input => "AudioInput",
        }
    }

    /// Run `accessor` against the freshly compiled wrapper. Errors are
    /// reported under the short action name, not the full script.
    async fn run_accessor(&self, action: &str, accessor: &str) -> Result<String> {
        let script = format!("{}\n{}", AUDIO_WRAPPER, accessor);
        self.runner
            .run(
                "powershell",
                &["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command", &script],
            )
            .await
            .map_err(|source| {
                XvolError::system(Platform::Windows, format!("powershell {}", action), source)
            })
    }
}

/// Accessor line reading the endpoint's scalar volume as a rounded
/// percentage. The catch arm keeps a COM activation hiccup from
/// producing empty output.
fn get_volume_accessor(device: AudioDevice) -> String {
    format!(
        r#"try {{ [Math]::Round([{}]::Volume * 100) }} catch {{ Write-Output "0" }}"#,
        WindowsVolumeController::class_name(device)
    )
}

fn set_volume_accessor(device: AudioDevice, level: u8) -> String {
    format!(
        "[{}]::Volume = {}",
        WindowsVolumeController::class_name(device),
        f64::from(level) / 100.0
    )
}

fn get_mute_accessor(device: AudioDevice) -> String {
    format!("[{}]::Mute", WindowsVolumeController::class_name(device))
}

fn set_mute_accessor(device: AudioDevice, muted: bool) -> String {
    format!(
        r#"[{}]::Mute = [bool]::Parse("{}")"#,
        WindowsVolumeController::class_name(device),
        muted
    )
}

#[async_trait::async_trait]
impl VolumeController for WindowsVolumeController {
    async fn get_volume(&self, device: AudioDevice) -> Result<u8> {
        let output = self
            .run_accessor("get-volume", &get_volume_accessor(device))
            .await?;
        let value: f64 = output.trim().parse().map_err(|_| {
            XvolError::system(
                Platform::Windows,
                "powershell get-volume",
                CommandError::Parse(format!("expected a volume percentage, got '{}'", output)),
            )
        })?;
        Ok(value.round().clamp(0.0, 100.0) as u8)
    }

    async fn set_volume(&self, device: AudioDevice, level: u8) -> Result<()> {
        validate_level(level)?;
        self.run_accessor("set-volume", &set_volume_accessor(device, level))
            .await?;
        Ok(())
    }

    async fn get_mute(&self, device: AudioDevice) -> Result<bool> {
        let output = self
            .run_accessor("get-mute", &get_mute_accessor(device))
            .await?;
        Ok(output.trim().eq_ignore_ascii_case("true"))
    }

    async fn set_mute(&self, device: AudioDevice, muted: bool) -> Result<()> {
        self.run_accessor("set-mute", &set_mute_accessor(device, muted))
            .await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "windows (powershell)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::FakeRunner;

    fn controller(runner: Arc<FakeRunner>) -> WindowsVolumeController {
        WindowsVolumeController::new(runner as Arc<dyn ProcessRunner>)
    }

    #[test]
    fn test_accessor_shapes() {
        assert_eq!(
            get_volume_accessor(AudioDevice::Output),
            r#"try { [Math]::Round([Audio]::Volume * 100) } catch { Write-Output "0" }"#
        );
        assert_eq!(
            get_volume_accessor(AudioDevice::Input),
            r#"try { [Math]::Round([AudioInput]::Volume * 100) } catch { Write-Output "0" }"#
        );
        assert_eq!(
            set_volume_accessor(AudioDevice::Output, 42),
            "[Audio]::Volume = 0.42"
        );
        assert_eq!(
            set_volume_accessor(AudioDevice::Input, 100),
            "[AudioInput]::Volume = 1"
        );
        assert_eq!(get_mute_accessor(AudioDevice::Input), "[AudioInput]::Mute");
        assert_eq!(
            set_mute_accessor(AudioDevice::Output, true),
            r#"[Audio]::Mute = [bool]::Parse("true")"#
        );
        assert_eq!(
            set_mute_accessor(AudioDevice::Input, false),
            r#"[AudioInput]::Mute = [bool]::Parse("false")"#
        );
    }

    #[test]
    fn test_wrapper_defines_both_endpoints() {
        assert!(AUDIO_WRAPPER.contains("public class Audio"));
        assert!(AUDIO_WRAPPER.contains("public class AudioInput"));
        assert!(AUDIO_WRAPPER.contains("GetDefaultAudioEndpoint(0, 0"));
        assert!(AUDIO_WRAPPER.contains("GetDefaultAudioEndpoint(1, 0"));
    }

    #[tokio::test]
    async fn test_get_volume_parses_and_clamps() {
        let runner = Arc::new(FakeRunner::new().ok_program("powershell", "55"));
        let ctrl = controller(Arc::clone(&runner));

        assert_eq!(ctrl.get_volume(AudioDevice::Output).await.unwrap(), 55);

        // The invocation carries the wrapper and the standard flags.
        let call = &runner.calls()[0];
        assert!(call.starts_with("powershell -NoProfile -ExecutionPolicy Bypass -Command"));
        assert!(call.contains("Add-Type"));
    }

    #[tokio::test]
    async fn test_get_volume_rounds_scalar_artifacts() {
        let runner = Arc::new(FakeRunner::new().ok_program("powershell", "54.99999"));
        let ctrl = controller(runner);
        assert_eq!(ctrl.get_volume(AudioDevice::Output).await.unwrap(), 55);
    }

    #[tokio::test]
    async fn test_get_volume_rejects_garbage() {
        let runner = Arc::new(FakeRunner::new().ok_program("powershell", "not a number"));
        let ctrl = controller(runner);

        let err = ctrl.get_volume(AudioDevice::Output).await.unwrap_err();
        match err {
            XvolError::SystemCommand { command, source, .. } => {
                assert_eq!(command, "powershell get-volume");
                assert!(matches!(source, CommandError::Parse(_)));
            }
            other => panic!("expected SystemCommand, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_mute_parses_boolean() {
        let runner = Arc::new(FakeRunner::new().ok_program("powershell", "True"));
        let ctrl = controller(runner);
        assert!(ctrl.get_mute(AudioDevice::Input).await.unwrap());

        let runner = Arc::new(FakeRunner::new().ok_program("powershell", "False"));
        let ctrl = controller(runner);
        assert!(!ctrl.get_mute(AudioDevice::Input).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_volume_rejects_out_of_range_without_commands() {
        let runner = Arc::new(FakeRunner::new());
        let ctrl = controller(Arc::clone(&runner));

        let err = ctrl.set_volume(AudioDevice::Output, 200).await.unwrap_err();
        assert!(matches!(err, XvolError::Validation(_)));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_script_host_failure_names_the_action() {
        let runner = Arc::new(FakeRunner::new().fail_program("powershell", "Add-Type failed"));
        let ctrl = controller(runner);

        let err = ctrl.set_mute(AudioDevice::Output, true).await.unwrap_err();
        match err {
            XvolError::SystemCommand { command, source, .. } => {
                assert_eq!(command, "powershell set-mute");
                match source {
                    CommandError::NonZeroExit { stderr, .. } => {
                        assert_eq!(stderr, "Add-Type failed")
                    }
                    other => panic!("expected NonZeroExit, got {:?}", other),
                }
            }
            other => panic!("expected SystemCommand, got {:?}", other),
        }
    }
}
