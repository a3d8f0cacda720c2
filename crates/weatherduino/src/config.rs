//! CLI-owned station selection and flag overrides.
//!
//! Precedence per key: CLI flag > station options > station data >
//! built-in default. Core never sees any of this -- it receives a
//! pre-built `StationConfig`.

use std::time::Duration;

use weatherduino_config::{
    Config, ConfigError, DeviceTypeOverride, StationEntry, StationOverrides, StationSettings,
    config_path, load_config, normalize_path, resolve_station,
};
use weatherduino_core::StationConfig;
use weatherduino_core::config::{DEFAULT_PATH, DEFAULT_PORT, DEFAULT_SCAN_INTERVAL};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `StationConfig` from the config file, the selected station,
/// and CLI flag overrides.
pub fn build_station_config(global: &GlobalOpts) -> Result<StationConfig, CliError> {
    // --host alone is a complete ad-hoc station definition.
    if let Some(ref host) = global.host {
        return apply_flags(resolve_station(&adhoc_entry(host))?, global);
    }

    let cfg = load_config()?;
    let name = select_station_name(global, &cfg)?;
    let entry = cfg
        .stations
        .get(&name)
        .ok_or_else(|| CliError::Config(ConfigError::NoSuchStation { name: name.clone() }))?;

    apply_flags(resolve_station(entry)?, global)
}

/// Pick the station name: `--station`, then `default_station`, then a
/// sole configured station.
fn select_station_name(global: &GlobalOpts, cfg: &Config) -> Result<String, CliError> {
    if let Some(ref name) = global.station {
        return Ok(name.clone());
    }
    if let Some(ref name) = cfg.default_station {
        return Ok(name.clone());
    }
    if cfg.stations.len() == 1 {
        if let Some(name) = cfg.stations.keys().next() {
            return Ok(name.clone());
        }
    }
    Err(CliError::NoStation {
        path: config_path().display().to_string(),
    })
}

fn adhoc_entry(host: &str) -> StationEntry {
    StationEntry {
        data: StationSettings {
            host: host.to_owned(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_owned(),
            device_type: DeviceTypeOverride::Auto,
            scan_interval: DEFAULT_SCAN_INTERVAL.as_secs(),
        },
        options: Some(StationOverrides::default()),
    }
}

/// Overlay CLI flags onto a resolved config. Flag values get the same
/// validation the file layer applies in `resolve_station`.
fn apply_flags(mut cfg: StationConfig, global: &GlobalOpts) -> Result<StationConfig, CliError> {
    if let Some(port) = global.port {
        cfg.port = port;
    }
    if let Some(ref path) = global.path {
        cfg.path = normalize_path(Some(path));
    }
    if let Some(device_type) = global.device_type {
        cfg.forced_kind = DeviceTypeOverride::from(device_type).forced();
    }
    if let Some(interval) = global.interval {
        if interval == 0 {
            return Err(CliError::Config(ConfigError::Validation {
                field: "interval".into(),
                reason: "scan interval must be a positive number of seconds".into(),
            }));
        }
        cfg.scan_interval = Duration::from_secs(interval);
    }
    Ok(cfg)
}
