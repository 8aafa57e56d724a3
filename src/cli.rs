use clap::{Args, Parser, ValueEnum};
use std::time::Duration;

use bravia_rs232::{LinkConfig, Operation, ReadTimeout};

#[derive(Parser, Debug, Clone)]
#[command(name = "bravia-rs232", about = "Sony Bravia TV control over RS-232C")]
pub struct Cli {
    /// Command to send
    #[arg(value_enum)]
    pub cmd: Cmd,
    #[command(flatten)]
    pub ser: SerialOpts,
    /// Log every frame sent and received
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    /// Power on
    On,
    /// Power off
    Off,
    /// Toggle power
    Power,
    /// Volume up one step
    VolumeUp,
    /// Volume down one step
    VolumeDown,
    /// Toggle muting
    Mute,
}

impl From<Cmd> for Operation {
    fn from(cmd: Cmd) -> Self {
        match cmd {
            Cmd::On => Operation::PowerOn,
            Cmd::Off => Operation::PowerOff,
            Cmd::Power => Operation::PowerToggle,
            Cmd::VolumeUp => Operation::VolumeUp,
            Cmd::VolumeDown => Operation::VolumeDown,
            Cmd::Mute => Operation::MuteToggle,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SerialOpts {
    /// Serial device path
    #[arg(long, env = "BRAVIA_DEV")]
    pub dev: String,
    /// Baud rate
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,
    /// Response timeout in milliseconds, or "none" to wait forever
    #[arg(long, default_value = "none", value_parser = ReadTimeout::from_cli)]
    pub timeout: ReadTimeout,
    /// Minimum gap between commands in milliseconds
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,
}

impl SerialOpts {
    pub fn link_config(&self) -> LinkConfig {
        LinkConfig {
            path: self.dev.clone(),
            baud: self.baud,
            read_timeout: self.timeout,
            command_interval: Duration::from_millis(self.interval_ms),
        }
    }
}
