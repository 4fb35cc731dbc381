//! Callback signature verification
//!
//! Wolopay signs callbacks by concatenating every query value in order,
//! appending the shared secret and hex-encoding the SHA-1 of the result.
//! The signature arrives as `Authorization: Signature <hex>`.

use crate::AuthResult;
use crate::credentials::Credentials;
use crate::digest::{LegacyDigest, SIGNATURE_DIGEST_LEN, Sha1Digest, checked_digest};
use crate::query::parse_query;
use http::HeaderMap;
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::debug;

/// Header names and schemes used by callbacks
pub mod headers {
    /// Header carrying the callback signature
    pub const AUTHORIZATION: &str = "Authorization";

    /// Scheme preceding the hex digest
    pub const SIGNATURE_SCHEME: &str = "Signature";
}

fn hex_signature(digest: &dyn LegacyDigest, query: &str, secret: &str) -> AuthResult<String> {
    let mut material = parse_query(query).values_concat();
    material.push_str(secret);

    let output = checked_digest(digest, SIGNATURE_DIGEST_LEN, &[material.as_bytes()])?;
    Ok(hex::encode(output))
}

fn header_matches(
    digest: &dyn LegacyDigest,
    query: &str,
    header: Option<&str>,
    secret: &str,
) -> bool {
    let Some(header) = header else {
        debug!("callback rejected: no signature header");
        return false;
    };

    let expected = match hex_signature(digest, query, secret) {
        Ok(hex) => format!("{} {}", headers::SIGNATURE_SCHEME, hex),
        Err(e) => {
            debug!(error = %e, "callback rejected: digest unavailable");
            return false;
        }
    };

    let valid = eq_ignore_ascii_case_ct(header, &expected);
    if !valid {
        debug!("callback rejected: signature mismatch");
    }
    valid
}

/// ASCII case-insensitive comparison in constant time for equal lengths.
fn eq_ignore_ascii_case_ct(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a = a.to_ascii_lowercase();
    let b = b.to_ascii_lowercase();
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Verifies `Authorization: Signature <hex>` on inbound callbacks.
#[derive(Clone)]
pub struct CallbackVerifier {
    credentials: Arc<Credentials>,
    digest: Arc<dyn LegacyDigest>,
}

impl CallbackVerifier {
    /// Create a verifier for the given credentials
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self {
            credentials,
            digest: Arc::new(Sha1Digest),
        }
    }

    /// Replace the signature digest
    pub fn with_digest(mut self, digest: impl LegacyDigest + 'static) -> Self {
        self.digest = Arc::new(digest);
        self
    }

    /// Hex signature the server would send for `query`.
    pub fn expected_signature(&self, query: &str) -> AuthResult<String> {
        hex_signature(
            self.digest.as_ref(),
            query,
            self.credentials.expose_secret(),
        )
    }

    /// Full `Authorization` header value for `query`.
    pub fn sign(&self, query: &str) -> AuthResult<String> {
        Ok(format!(
            "{} {}",
            headers::SIGNATURE_SCHEME,
            self.expected_signature(query)?
        ))
    }

    /// Check a presented header value against `query`.
    ///
    /// Every failure, including a missing header, is reported as `false`.
    pub fn is_valid(&self, query: &str, header: Option<&str>) -> bool {
        header_matches(
            self.digest.as_ref(),
            query,
            header,
            self.credentials.expose_secret(),
        )
    }

    /// Check the `Authorization` header of a request.
    ///
    /// A request without a query string is verified as an empty one.
    pub fn verify_headers(&self, query: Option<&str>, headers: &HeaderMap) -> bool {
        let header = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        self.is_valid(query.unwrap_or(""), header)
    }
}

impl fmt::Debug for CallbackVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackVerifier")
            .field("client_id", &self.credentials.client_id())
            .field("digest", &self.digest.name())
            .finish()
    }
}

/// Check a callback signature header against `query` and `secret`.
pub fn is_valid(query: &str, header: Option<&str>, secret: &str) -> bool {
    header_matches(&Sha1Digest, query, header, secret)
}
