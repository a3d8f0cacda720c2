// WeatherDuino HTTP client
//
// One client per configured station. The endpoint serves a single flat
// JSON object of scalar fields; there is no envelope, no pagination, and
// no authentication. The only transport quirk worth noting is that some
// firmware versions label the response `text/html` or `text/plain`, so
// the body is always read as text and parsed manually.

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// A raw device payload: the flat JSON object exactly as the device
/// reported it. Replaced wholesale on every successful poll.
pub type RawPayload = serde_json::Map<String, Value>;

/// HTTP client for a single WeatherDuino station.
pub struct StationClient {
    http: reqwest::Client,
    endpoint: Url,
    host: String,
    timeout_secs: u64,
}

impl StationClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `endpoint` is the full poll URL (e.g. `http://192.168.1.50/json`);
    /// `host` is the user-configured host string, kept for display naming
    /// when the payload carries no usable `ID` field.
    pub fn new(endpoint: Url, host: String, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            endpoint,
            host,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(endpoint: Url, host: String, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint,
            host,
            timeout_secs: crate::transport::DEFAULT_TIMEOUT.as_secs(),
        }
    }

    /// The poll URL this client targets.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The configured host string.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Fetch the device's JSON document.
    ///
    /// Accepts any declared content type -- the body is read as text and
    /// parsed with serde_json regardless of what the device claims.
    /// Non-2xx statuses, timeouts, and malformed bodies all map to an
    /// [`Error`] carrying the offending URL.
    pub async fn fetch(&self) -> Result<RawPayload, Error> {
        debug!("GET {}", self.endpoint);

        let resp = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| self.classify_reqwest(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = resp.text().await.map_err(|e| self.classify_reqwest(e))?;

        let value: Value = serde_json::from_str(&body).map_err(|e| Error::Json {
            message: e.to_string(),
            url: self.endpoint.to_string(),
        })?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(Error::Json {
                message: format!("expected a JSON object, got {}", json_type_name(&other)),
                url: self.endpoint.to_string(),
            }),
        }
    }

    /// The display identity for the most recent payload: the device's own
    /// `ID` field when present and non-blank, otherwise the configured
    /// host. Display naming only -- no protocol significance.
    pub fn device_id(&self, payload: &RawPayload) -> String {
        device_id(payload, &self.host)
    }

    fn classify_reqwest(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                url: self.endpoint.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(e)
        }
    }
}

/// Derive a display device id from a payload, falling back to `host`.
pub fn device_id(payload: &RawPayload, host: &str) -> String {
    payload
        .get("ID")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map_or_else(|| host.to_owned(), str::to_owned)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
