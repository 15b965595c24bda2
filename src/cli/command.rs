use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};
use owon::process::client::StartCommand;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (owon ",
    env!("OWON_VERSION"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Debug, ClapParser)]
#[command(
    name         = env!("CARGO_PKG_NAME"),
    version      = env!("CARGO_PKG_VERSION"),
    long_version = LONG_VERSION,
    about        = "Tools for inspecting and fetching OWON oscilloscope waveform captures",
    long_about   = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Reject captures from unrecognized models instead of guessing their layout.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Show progress bars during network transfers.
    #[arg(long, global = true)]
    pub progress: bool,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print capture and channel information.
    Info(InfoArgs),

    /// Write a capture with all samples as a YAML document.
    Export(ExportArgs),

    /// Fetch a capture from a device over the network.
    Fetch(FetchArgs),
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Input capture file (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Number of leading samples to print per channel.
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    pub samples: usize,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Input capture file (use "-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output path of the YAML document. Written to stdout when omitted.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Device host name or address.
    #[arg(long)]
    pub host: String,

    /// Device TCP port.
    #[arg(long)]
    pub port: u16,

    /// Data to request from the device.
    #[arg(long, value_enum, default_value_t = FetchCommand::Bin)]
    pub command: FetchCommand,

    /// Save the raw response to this path.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Connection read/write timeout in seconds (0 disables it).
    #[arg(long, value_name = "SECONDS", default_value_t = 10)]
    pub timeout: u64,

    /// Number of leading samples to print per channel.
    #[arg(long, value_name = "COUNT", default_value_t = 0)]
    pub samples: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum FetchCommand {
    /// Vector data of the displayed waveform (STARTBIN).
    Bin,
    /// Vector data of the deep memory (STARTMEMDEPTH).
    Memdepth,
    /// Screenshot bitmap, saved without decoding (STARTBMP).
    Bmp,
}

impl From<FetchCommand> for StartCommand {
    fn from(command: FetchCommand) -> Self {
        match command {
            FetchCommand::Bin => StartCommand::Vector,
            FetchCommand::Memdepth => StartCommand::DeepMemory,
            FetchCommand::Bmp => StartCommand::Bitmap,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

impl Cli {
    /// Failure level handed to the capture decoder.
    pub fn fail_level(&self) -> log::Level {
        if self.strict {
            log::Level::Warn
        } else {
            log::Level::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fetch() {
        let cli = Cli::try_parse_from([
            "owonscope",
            "--strict",
            "fetch",
            "--host",
            "scope.local",
            "--port",
            "3000",
            "--command",
            "memdepth",
        ])
        .unwrap();

        assert_eq!(cli.fail_level(), log::Level::Warn);
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.port, 3000);
                assert_eq!(
                    StartCommand::from(args.command),
                    StartCommand::DeepMemory
                );
                assert_eq!(args.timeout, 10);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn lenient_by_default() {
        let cli = Cli::try_parse_from(["owonscope", "info", "capture.bin"]).unwrap();
        assert_eq!(cli.fail_level(), log::Level::Error);
    }
}
