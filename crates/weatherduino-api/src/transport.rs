// Transport configuration for building reqwest::Client instances.
//
// The devices speak plain HTTP with no authentication, so this stays
// minimal: a bounded timeout and a user agent. The timeout caps both the
// connect phase and the body read of a single poll.

use std::time::Duration;

/// Default per-request timeout. Polls never overlap, so a slow device
/// simply fails the cycle and the next tick retries.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("weatherduino-rs/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;
        Ok(client)
    }
}
