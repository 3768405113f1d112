use thiserror::Error;

use crate::types::error_types::{Error as ApiError, ErrorKind};

/// A unified error type for this library.
#[derive(Debug, Error)]
pub enum RevoltError {
    /// HTTP request failed (network or protocol issue).
    #[error("Reqwest Error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    /// HTTP returned a non-2xx status with a typed error body.
    #[error("API Error: {0:?}")]
    ApiError(ApiError),

    /// The server returned an error code we couldn't parse as `ApiError`.
    /// Contains the HTTP status code and raw body.
    #[error("Non-success HTTP status {code}, body: {body}")]
    HttpStatus { code: u16, body: String },

    /// Serde (de)serialization error.
    #[error("Serde JSON error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// WebSocket transport or handshake failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    // Other
    #[error("Other error: {0}")]
    Other(String),
}

impl From<ApiError> for RevoltError {
    fn from(err: ApiError) -> Self {
        RevoltError::ApiError(err)
    }
}

impl RevoltError {
    /// The typed error kind, if the server sent one.
    pub fn api_kind(&self) -> Option<&ErrorKind> {
        match self {
            RevoltError::ApiError(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// HTTP status of a failed request, when known.
    pub fn status(&self) -> Option<u16> {
        match self {
            RevoltError::HttpStatus { code, .. } => Some(*code),
            RevoltError::ReqwestError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
