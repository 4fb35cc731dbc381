//! Error types for signing operations

use thiserror::Error;

/// Errors raised by the signing side of the protocol.
///
/// Callback verification never surfaces these to its caller: every failure
/// there collapses to `false`.
#[derive(Error, Debug)]
pub enum AuthError {
    /// A required digest could not produce a usable result
    #[error("Signing unavailable: {0}")]
    SigningUnavailable(String),

    /// Credentials cannot be embedded in a token
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// A WSSE header could not be parsed
    #[error("Malformed token: {0}")]
    MalformedToken(String),
}

/// Result type for signing operations
pub type AuthResult<T> = Result<T, AuthError>;
