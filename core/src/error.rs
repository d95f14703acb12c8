//! Error types for the Resources API client.
//!
//! # Design
//! One enum covers the whole call path, in the order a call can fail:
//! argument validation, request building, transport, then response decoding.
//! Non-2xx responses keep the server's `ErrorReport` so callers can inspect
//! the message and causes. `NotFound` is not a separate variant; use
//! `ClientError::is_not_found`.

use thiserror::Error;

use crate::types::ErrorReport;

/// Errors returned by `ResourcesClient` and `ResourcesApi`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A required parameter was empty. No request was sent.
    #[error("missing required parameter `{name}`")]
    InvalidArgument { name: &'static str },

    /// The request could not be built from the operation descriptor.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The request did not complete: connect failure, timeout or I/O error.
    #[error("transport error: {0}")]
    Transport(String),

    /// A 2xx response body could not be decoded into the expected type.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {}", .report.message)]
    Api { status: u16, report: ErrorReport },
}

impl ClientError {
    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            ClientError::Api { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Errors raised while loading `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
