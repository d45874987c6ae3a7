// Command-line interface definitions for xvol
//
// Kept in its own module so the argument surface stays in one place,
// separate from the dispatch logic in main.rs.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xvol")]
#[command(author, version, about = "Volume and mute control for the default audio devices")]
#[command(long_about = "
xvol reads and sets the volume level and mute state of the default
audio output (speaker) and input (microphone) device, using the native
tooling of each platform:

  Linux    amixer (ALSA), falling back to pactl (PulseAudio)
  macOS    AppleScript volume settings via osascript
  Windows  Core Audio endpoint volume via powershell

DEVICE is 'output' (default) or 'input'.
")]
pub struct Cli {
    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the current volume level (0-100)
    Get {
        /// Device to query: output or input
        #[arg(default_value = "output")]
        device: String,
    },

    /// Set the volume level (0-100)
    Set {
        /// Volume percentage
        level: u8,

        /// Device to change: output or input
        #[arg(default_value = "output")]
        device: String,
    },

    /// Mute a device
    Mute {
        /// Device to mute: output or input
        #[arg(default_value = "output")]
        device: String,
    },

    /// Unmute a device
    Unmute {
        /// Device to unmute: output or input
        #[arg(default_value = "output")]
        device: String,
    },

    /// Print volume and mute state for both devices
    Status,
}
