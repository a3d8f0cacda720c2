// ── Station resolution ──
//
// Turns the two-layer data/options entry into the immutable
// `StationConfig` the core polls with. Options win key-by-key; the
// initial data is the fallback. All user input normalization happens
// here, once, so the rest of the system never sees a pathless URL or a
// zero interval.

use std::time::Duration;

use weatherduino_core::StationConfig;

use crate::{ConfigError, StationEntry};

/// Per-request fetch timeout. The devices answer in well under a second
/// on a healthy LAN; ten seconds covers flaky WiFi without stalling the
/// poll loop forever.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Normalize the JSON document path.
///
/// - `None` / empty / whitespace → `"/"` (root; needed for WeatherDisplay)
/// - otherwise ensure a leading `"/"`
///
/// Idempotent: normalizing a normalized path is a no-op.
pub fn normalize_path(raw: Option<&str>) -> String {
    let path = raw.unwrap_or("").trim();

    if path.is_empty() {
        return "/".to_owned();
    }

    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

/// Resolve one station entry into a runtime `StationConfig`.
///
/// Fails with a recoverable validation error (no config produced) when
/// the host is empty or the scan interval is zero.
pub fn resolve_station(entry: &StationEntry) -> Result<StationConfig, ConfigError> {
    let options = entry.options.clone().unwrap_or_default();

    let host = options
        .host
        .unwrap_or_else(|| entry.data.host.clone())
        .trim()
        .to_owned();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "host must not be empty".into(),
        });
    }

    let port = options.port.unwrap_or(entry.data.port);

    let path = normalize_path(Some(
        options.path.as_deref().unwrap_or(&entry.data.path),
    ));

    let scan_interval = options.scan_interval.unwrap_or(entry.data.scan_interval);
    if scan_interval == 0 {
        return Err(ConfigError::Validation {
            field: "scan_interval".into(),
            reason: "scan interval must be a positive number of seconds".into(),
        });
    }

    let device_type = options.device_type.unwrap_or(entry.data.device_type);

    Ok(StationConfig {
        host,
        port,
        path,
        scan_interval: Duration::from_secs(scan_interval),
        forced_kind: device_type.forced(),
        timeout: FETCH_TIMEOUT,
    })
}
