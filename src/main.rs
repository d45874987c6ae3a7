//! xvol - volume and mute control for the default audio devices
//!
//! Run `xvol status` for an overview, `xvol set 40` to change the
//! speaker volume, `xvol mute input` to mute the microphone.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use xvol::cli::{Cli, Commands};
use xvol::AudioDevice;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("xvol={},warn", log_level))),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Get { device } => {
            let device: AudioDevice = device.parse()?;
            println!("{}", xvol::get_volume(device).await?);
        }

        Commands::Set { level, device } => {
            let device: AudioDevice = device.parse()?;
            xvol::set_volume(device, level).await?;
        }

        Commands::Mute { device } => {
            let device: AudioDevice = device.parse()?;
            xvol::set_mute(device, true).await?;
        }

        Commands::Unmute { device } => {
            let device: AudioDevice = device.parse()?;
            xvol::set_mute(device, false).await?;
        }

        Commands::Status => {
            for device in [AudioDevice::Output, AudioDevice::Input] {
                let info = xvol::volume_info(device).await?;
                println!(
                    "{}: {}%{}",
                    device,
                    info.level,
                    if info.muted { " (muted)" } else { "" }
                );
            }
        }
    }

    Ok(())
}
