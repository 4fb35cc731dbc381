//! Error types for Wolopay API calls

use thiserror::Error;
use wolopay_auth::AuthError;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// Request could not be signed; nothing was sent
    #[error("Signing error: {0}")]
    Signing(#[from] AuthError),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API answered with an error status
    #[error("API error: {status} - {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Response JSON has an unexpected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Callback signature did not verify
    #[error("Invalid callback signature")]
    InvalidCallbackSignature,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status code, if the API answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
