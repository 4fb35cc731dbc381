//! WSSE UsernameToken signing for outbound requests
//!
//! Every request to the Wolopay API carries an `X-WSSE` header proving the
//! client knows the shared secret:
//!
//! ```text
//! UsernameToken Username="<id>", PasswordDigest="<b64 sha1>", Nonce="<b64 md5>", Created="<ts>"
//! ```
//!
//! The nonce is MD5 over 32 fresh random bytes. The password digest is SHA-1
//! over the raw nonce, the `Created` string and the secret, concatenated.

use crate::credentials::Credentials;
use crate::digest::{
    LegacyDigest, Md5Digest, NONCE_DIGEST_LEN, SIGNATURE_DIGEST_LEN, Sha1Digest, checked_digest,
};
use crate::entropy::{EntropySource, ThreadEntropy};
use crate::{AuthError, AuthResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Request header carrying the token
pub const WSSE_HEADER: &str = "X-WSSE";

/// Number of random bytes hashed into each nonce
pub const NONCE_SEED_LEN: usize = 32;

// The server expects UTC rendered with a literal "+0000" suffix.
const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+0000";

const TOKEN_PREFIX: &str = "UsernameToken ";

/// Format an instant the way the `Created` field expects.
pub fn format_created(instant: DateTime<Utc>) -> String {
    instant.format(CREATED_FORMAT).to_string()
}

/// Compute the base64 `PasswordDigest` for a raw nonce and timestamp.
pub fn password_digest(
    digest: &dyn LegacyDigest,
    raw_nonce: &[u8],
    created: &str,
    secret: &str,
) -> AuthResult<String> {
    let output = checked_digest(
        digest,
        SIGNATURE_DIGEST_LEN,
        &[raw_nonce, created.as_bytes(), secret.as_bytes()],
    )?;
    Ok(STANDARD.encode(output))
}

/// A single-use WSSE UsernameToken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsseToken {
    /// Client id
    pub username: String,
    /// Base64 SHA-1 of nonce, timestamp and secret
    pub password_digest: String,
    /// Base64 MD5 nonce
    pub nonce: String,
    /// Creation timestamp
    pub created: String,
}

impl WsseToken {
    /// Parse a rendered `X-WSSE` header value.
    pub fn parse(header: &str) -> AuthResult<Self> {
        let mut rest = header
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| AuthError::MalformedToken("missing UsernameToken prefix".into()))?;

        let mut fields = Vec::with_capacity(4);
        for (index, name) in ["Username", "PasswordDigest", "Nonce", "Created"]
            .into_iter()
            .enumerate()
        {
            if index > 0 {
                rest = rest
                    .strip_prefix(", ")
                    .ok_or_else(|| AuthError::MalformedToken(format!("expected ', ' before {name}")))?;
            }
            rest = rest
                .strip_prefix(name)
                .and_then(|r| r.strip_prefix("=\""))
                .ok_or_else(|| AuthError::MalformedToken(format!("missing field {name}")))?;
            let end = rest
                .find('"')
                .ok_or_else(|| AuthError::MalformedToken(format!("unterminated field {name}")))?;
            fields.push(rest[..end].to_string());
            rest = &rest[end + 1..];
        }

        if !rest.is_empty() {
            return Err(AuthError::MalformedToken("trailing data".into()));
        }

        let created = fields.pop().unwrap_or_default();
        let nonce = fields.pop().unwrap_or_default();
        let password_digest = fields.pop().unwrap_or_default();
        let username = fields.pop().unwrap_or_default();

        Ok(Self {
            username,
            password_digest,
            nonce,
            created,
        })
    }

    /// Decode the nonce back to its raw digest bytes.
    pub fn raw_nonce(&self) -> AuthResult<Vec<u8>> {
        STANDARD
            .decode(&self.nonce)
            .map_err(|e| AuthError::MalformedToken(format!("nonce is not base64: {e}")))
    }

    /// Recompute the password digest with `secret` and compare.
    pub fn matches_secret(&self, secret: &str) -> bool {
        let Ok(raw_nonce) = self.raw_nonce() else {
            return false;
        };
        password_digest(&Sha1Digest, &raw_nonce, &self.created, secret)
            .map(|expected| expected == self.password_digest)
            .unwrap_or(false)
    }
}

impl fmt::Display for WsseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Username=\"{}\", PasswordDigest=\"{}\", Nonce=\"{}\", Created=\"{}\"",
            TOKEN_PREFIX, self.username, self.password_digest, self.nonce, self.created
        )
    }
}

/// Produces a fresh [`WsseToken`] per request.
///
/// Holds no mutable state; clones share the credentials and entropy source.
#[derive(Clone)]
pub struct WsseSigner {
    credentials: Arc<Credentials>,
    entropy: Arc<dyn EntropySource>,
    nonce_digest: Arc<dyn LegacyDigest>,
    password_digest: Arc<dyn LegacyDigest>,
}

impl WsseSigner {
    /// Create a signer backed by the thread-local CSPRNG
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self {
            credentials,
            entropy: Arc::new(ThreadEntropy),
            nonce_digest: Arc::new(Md5Digest),
            password_digest: Arc::new(Sha1Digest),
        }
    }

    /// Replace the random source
    pub fn with_entropy(mut self, entropy: impl EntropySource + 'static) -> Self {
        self.entropy = Arc::new(entropy);
        self
    }

    /// Replace the digest pair
    pub fn with_digests(
        mut self,
        nonce_digest: impl LegacyDigest + 'static,
        password_digest: impl LegacyDigest + 'static,
    ) -> Self {
        self.nonce_digest = Arc::new(nonce_digest);
        self.password_digest = Arc::new(password_digest);
        self
    }

    /// Credentials used for signing
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build a token stamped with the current time.
    pub fn token(&self) -> AuthResult<WsseToken> {
        self.token_at(Utc::now())
    }

    /// Build a token stamped with `now`.
    pub fn token_at(&self, now: DateTime<Utc>) -> AuthResult<WsseToken> {
        let mut seed = [0u8; NONCE_SEED_LEN];
        self.entropy.fill(&mut seed);

        let raw_nonce = checked_digest(self.nonce_digest.as_ref(), NONCE_DIGEST_LEN, &[seed.as_slice()])?;
        let created = format_created(now);
        let digest = password_digest(
            self.password_digest.as_ref(),
            &raw_nonce,
            &created,
            self.credentials.expose_secret(),
        )?;

        Ok(WsseToken {
            username: self.credentials.client_id().to_string(),
            password_digest: digest,
            nonce: STANDARD.encode(&raw_nonce),
            created,
        })
    }

    /// Render a header value, or an empty string when signing fails.
    ///
    /// An empty value means the request must not be sent.
    pub fn header_value(&self) -> String {
        match self.token() {
            Ok(token) => token.to_string(),
            Err(e) => {
                warn!(error = %e, "WSSE signing failed");
                String::new()
            }
        }
    }
}

impl fmt::Debug for WsseSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsseSigner")
            .field("client_id", &self.credentials.client_id())
            .field("nonce_digest", &self.nonce_digest.name())
            .field("password_digest", &self.password_digest.name())
            .finish()
    }
}

/// Generate an `X-WSSE` header value for `identifier` and `secret`.
///
/// Returns an empty string if no token can be produced.
pub fn generate_token(identifier: &str, secret: &str) -> String {
    match Credentials::new(identifier, secret) {
        Ok(credentials) => WsseSigner::new(Arc::new(credentials)).header_value(),
        Err(e) => {
            warn!(error = %e, "WSSE signing failed");
            String::new()
        }
    }
}
