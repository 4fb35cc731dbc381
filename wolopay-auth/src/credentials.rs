//! Client credentials

use crate::{AuthError, AuthResult};
use secrecy::{ExposeSecret, SecretString};

/// Client id and shared secret issued by Wolopay.
///
/// The client id travels in every WSSE token; the secret only ever feeds
/// one-way digests and is redacted from `Debug` output.
#[derive(Debug)]
pub struct Credentials {
    client_id: String,
    secret: SecretString,
}

impl Credentials {
    /// Create credentials.
    ///
    /// The client id is embedded in a quoted header field, so it must be
    /// non-empty and free of quotes and control characters.
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> AuthResult<Self> {
        let client_id = client_id.into();

        if client_id.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "client id must not be empty".into(),
            ));
        }
        if client_id.chars().any(|c| c == '"' || c.is_control()) {
            return Err(AuthError::InvalidCredentials(
                "client id contains quotes or control characters".into(),
            ));
        }

        Ok(Self {
            client_id,
            secret: SecretString::new(secret.into().into()),
        })
    }

    /// Public client identifier
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Shared secret, for digest input only
    pub fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }
}
