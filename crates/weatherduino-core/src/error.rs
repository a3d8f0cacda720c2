// ── Core error types ──
//
// Consumers never see reqwest or serde_json failures directly; the
// `From<weatherduino_api::Error>` impl folds the transport taxonomy into
// a single transient `Fetch` variant carrying the offending URL.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A poll cycle failed. Transient: the next tick retries and a
    /// success clears it automatically.
    #[error("Fetch from {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    /// An operation that needs a running station was called too early.
    #[error("Station has not been started")]
    NotStarted,

    /// Configuration handed to the core is unusable.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<weatherduino_api::Error> for CoreError {
    fn from(err: weatherduino_api::Error) -> Self {
        let url = err.url().unwrap_or("<unknown>").to_owned();
        Self::Fetch {
            url,
            reason: err.to_string(),
        }
    }
}
