use thiserror::Error;

/// Top-level error type for the `weatherduino-api` crate.
///
/// Every variant describes a failed poll cycle. The devices are cheap
/// embedded webservers that drop connections, reboot mid-response, and
/// mislabel content types -- all of these are expected to clear on the
/// next poll, so `weatherduino-core` treats them as transient.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL construction failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// Device answered with a non-success status code.
    #[error("Device returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Response body was not a flat JSON object.
    #[error("Invalid JSON from {url}: {message}")]
    Json { message: String, url: String },
}

impl Error {
    /// Returns `true` if this is a transient error that a future poll
    /// can clear without intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Timeout { .. } | Self::Status { .. } | Self::Json { .. } => true,
            Self::InvalidUrl(_) => false,
        }
    }

    /// The URL the failing request was issued against, if known.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Timeout { url, .. } | Self::Status { url, .. } | Self::Json { url, .. } => {
                Some(url)
            }
            Self::Transport(e) => e.url().map(url::Url::as_str),
            Self::InvalidUrl(_) => None,
        }
    }
}
