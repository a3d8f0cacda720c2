//! CLI error types.
//!
//! Wraps the library error taxonomies and maps each to a process exit
//! code. Fetch failures are transient by design, so they exit with the
//! general code; configuration problems get the usage code.

use thiserror::Error;

use weatherduino_config::ConfigError;
use weatherduino_core::CoreError;

/// Exit codes for failure cases; success is the process default.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Api(#[from] weatherduino_api::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(
        "no station selected: pass --host, or --station <name>, or set default_station in {path}"
    )]
    NoStation { path: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::NoStation { .. } => exit_code::USAGE,
            Self::Core(CoreError::Fetch { .. }) | Self::Api(_) => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}
