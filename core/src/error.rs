//! Error types for the CRE client.
//!
//! # Design
//! Two failure modes reach the caller. `Http` means the upstream answered
//! with a non-2xx status; the status code and raw body are kept as fields.
//! `Transport` means no response arrived at all (connect failure, timeout),
//! and the transport's own error is carried untouched as the source.
//!
//! A 404 from the roster fetch is not an error: `fetch_offering` reports it
//! as `Ok(None)`.

use thiserror::Error;

/// Boxed error produced by a [`crate::Transport`] implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `CreClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The upstream returned a non-2xx status.
    #[error("request to {url} failed with HTTP {status}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    /// No response was received.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },
}

impl ApiError {
    /// Upstream status code, if the upstream responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport { .. } => None,
        }
    }

    /// Upstream response body, if the upstream responded.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Http { body, .. } => Some(body),
            ApiError::Transport { .. } => None,
        }
    }
}
