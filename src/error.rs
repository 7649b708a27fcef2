//! Unified error types.

use thiserror::Error;

/// Top-level crate error.
#[derive(Error, Debug)]
pub enum MetalsError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Errors from the quote source adapter.
///
/// Two-way taxonomy: either the upstream could not be reached (transport,
/// timeout, non-2xx), or it answered with something that is not a usable
/// quotation payload. Staleness is not an error — serving a stale cache
/// entry is the designed fallback when a refresh fails.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Upstream unavailable: {reason}")]
    UpstreamUnavailable { reason: String },

    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },
}

impl FetchError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::malformed(e.to_string())
        } else {
            FetchError::unavailable(e.to_string())
        }
    }
}
