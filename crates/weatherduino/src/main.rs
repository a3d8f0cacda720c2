mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{} {err}", "error:".red().bold());
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't touch the network
        Command::Config(args) => commands::config_cmd::handle(args),

        Command::Fetch => {
            let station_config = config::build_station_config(&cli.global)?;
            commands::fetch::handle(station_config).await
        }

        Command::Watch(args) => {
            let station_config = config::build_station_config(&cli.global)?;
            commands::watch::handle(station_config, args).await
        }

        Command::Detect => {
            let station_config = config::build_station_config(&cli.global)?;
            commands::detect::handle(station_config).await
        }
    }
}
