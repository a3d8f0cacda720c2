//! Clap derive structures for the `weatherduino` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use weatherduino_config::DeviceTypeOverride;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// weatherduino -- poll WeatherDuino stations over their local JSON endpoint
#[derive(Debug, Parser)]
#[command(
    name = "weatherduino",
    version,
    about = "Read WeatherDuino weather and air-quality stations from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Station name from the config file
    #[arg(long, short = 's', env = "WEATHERDUINO_STATION", global = true)]
    pub station: Option<String>,

    /// Device host or IP (overrides the config file)
    #[arg(long, env = "WEATHERDUINO_HOST", global = true)]
    pub host: Option<String>,

    /// Device HTTP port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Path of the JSON document (empty means the root document)
    #[arg(long, global = true)]
    pub path: Option<String>,

    /// Force a device type instead of sniffing payload keys
    #[arg(long, value_enum, global = true)]
    pub device_type: Option<DeviceTypeArg>,

    /// Seconds between polls
    #[arg(long, short = 'i', global = true)]
    pub interval: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// CLI-facing device type values; `auto` enables per-poll sniffing.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DeviceTypeArg {
    Auto,
    #[value(name = "4pro")]
    FourPro,
    Weatherdisplay,
    Aqm2,
    Aqm3,
}

impl From<DeviceTypeArg> for DeviceTypeOverride {
    fn from(arg: DeviceTypeArg) -> Self {
        match arg {
            DeviceTypeArg::Auto => Self::Auto,
            DeviceTypeArg::FourPro => Self::FourPro,
            DeviceTypeArg::Weatherdisplay => Self::WeatherDisplay,
            DeviceTypeArg::Aqm2 => Self::Aqm2,
            DeviceTypeArg::Aqm3 => Self::Aqm3,
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll once and print every sensor the payload exposes
    Fetch,

    /// Poll continuously, reprinting values on each refresh
    Watch(WatchArgs),

    /// Poll once and print the inferred device type with its evidence
    Detect,

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many refreshes (default: until Ctrl-C)
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a starter configuration file
    Init,
}
