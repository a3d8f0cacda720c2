//! Shared configuration for WeatherDuino tools.
//!
//! TOML station definitions with a two-layer data/options model, figment
//! loading (file + env), and translation to
//! `weatherduino_core::StationConfig`. A station's initial `data` fields
//! are what the user entered at setup; the optional `options` table holds
//! later edits and takes precedence key-by-key.

use std::collections::HashMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use weatherduino_core::DeviceKind;
use weatherduino_core::config::{DEFAULT_PATH, DEFAULT_PORT, DEFAULT_SCAN_INTERVAL};

mod resolve;

pub use resolve::{normalize_path, resolve_station};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("stations '{first}' and '{second}' both describe {unique_id}")]
    DuplicateStation {
        unique_id: String,
        first: String,
        second: String,
    },

    #[error("no station named '{name}' in config")]
    NoSuchStation { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Station used when none is named on the command line.
    pub default_station: Option<String>,

    /// Named station definitions.
    #[serde(default)]
    pub stations: HashMap<String, StationEntry>,
}

/// One configured station: initial setup data plus optional later edits.
#[derive(Debug, Deserialize, Serialize)]
pub struct StationEntry {
    #[serde(flatten)]
    pub data: StationSettings,

    /// Later-edited overrides. Present keys win over `data`; absent keys
    /// fall back to it.
    pub options: Option<StationOverrides>,
}

/// Device-type selection. `Auto` sniffs payload keys per poll; any other
/// value forces that variant even if the payload contradicts it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum DeviceTypeOverride {
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "4pro")]
    FourPro,
    #[serde(rename = "weatherdisplay")]
    WeatherDisplay,
    #[serde(rename = "aqm2")]
    Aqm2,
    #[serde(rename = "aqm3")]
    Aqm3,
}

impl DeviceTypeOverride {
    /// The forced kind, or `None` for auto-detection.
    pub fn forced(self) -> Option<DeviceKind> {
        match self {
            Self::Auto => None,
            Self::FourPro => Some(DeviceKind::FourPro),
            Self::WeatherDisplay => Some(DeviceKind::WeatherDisplay),
            Self::Aqm2 => Some(DeviceKind::Aqm2),
            Self::Aqm3 => Some(DeviceKind::Aqm3),
        }
    }
}

/// Initial setup data for a station.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationSettings {
    /// Device hostname or IP (required).
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the JSON document. Cleared ("") means the root document,
    /// which WeatherDisplay serves.
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default)]
    pub device_type: DeviceTypeOverride,

    /// Seconds between polls.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,
}

/// Later-edited overrides; every field optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StationOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub device_type: Option<DeviceTypeOverride>,
    pub scan_interval: Option<u64>,
}

// Serde defaults mirror the core constants so the file format and the
// runtime config can never drift apart.
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_path() -> String {
    DEFAULT_PATH.to_owned()
}
fn default_scan_interval() -> u64 {
    DEFAULT_SCAN_INTERVAL.as_secs()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "weatherduino", "weatherduino").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("weatherduino");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path (tests, `--config` flags).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WEATHERDUINO_").split("__"));

    let config: Config = figment.extract()?;
    validate_uniqueness(&config)?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Refuse two entries that resolve to the same device (host:port).
fn validate_uniqueness(config: &Config) -> Result<(), ConfigError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut names: Vec<&String> = config.stations.keys().collect();
    names.sort();

    for name in names {
        let entry = &config.stations[name];
        let resolved = resolve_station(entry)?;
        let unique_id = resolved.unique_id();
        if let Some(first) = seen.get(&unique_id) {
            return Err(ConfigError::DuplicateStation {
                unique_id,
                first: (*first).to_owned(),
                second: name.clone(),
            });
        }
        seen.insert(unique_id, name);
    }
    Ok(())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
