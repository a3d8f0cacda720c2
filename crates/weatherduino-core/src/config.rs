// ── Runtime station configuration ──
//
// Describes *how* to poll one station. The CLI (or any other host)
// constructs a `StationConfig` and hands it in; file formats and option
// layering live in `weatherduino-config`, never here.

use std::time::Duration;

use url::Url;

use crate::classify::DeviceKind;

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_PATH: &str = "/json";
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Resolved, immutable configuration for one station.
///
/// Editing options produces a new instance; nothing mutates in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationConfig {
    pub host: String,
    pub port: u16,
    /// Always starts with "/".
    pub path: String,
    /// Interval between polls; always positive.
    pub scan_interval: Duration,
    /// `Some` disables runtime classification and forces that variant,
    /// even if payload keys contradict it.
    pub forced_kind: Option<DeviceKind>,
    /// Per-request timeout for the poll itself.
    pub timeout: Duration,
}

impl StationConfig {
    /// Base URL for the device. Port 80 is omitted, matching how the
    /// devices print their own address.
    pub fn base_url(&self) -> String {
        if self.port == DEFAULT_PORT {
            format!("http://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    /// The full poll URL.
    pub fn endpoint_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}{}", self.base_url(), self.path))
    }

    /// Uniqueness key preventing duplicate entries for the same device.
    pub fn unique_id(&self) -> String {
        format!("weatherduino-{}:{}", self.host, self.port)
    }
}
