//! Request signing and callback verification for the Wolopay API
//!
//! Wolopay authenticates traffic in both directions with a shared secret
//! that never crosses the wire:
//!
//! - **Outbound**: every API request carries an `X-WSSE` UsernameToken whose
//!   password digest proves possession of the secret.
//! - **Inbound**: every callback carries `Authorization: Signature <hex>`,
//!   a SHA-1 over the callback's query values and the secret.
//!
//! Both sides are synchronous and safe to share across threads.
//!
//! # Example: Signing a Request
//!
//! ```rust
//! use std::sync::Arc;
//! use wolopay_auth::{Credentials, WsseSigner, WSSE_HEADER};
//!
//! let credentials = Arc::new(Credentials::new("client-id", "secret")?);
//! let signer = WsseSigner::new(credentials);
//!
//! let token = signer.token()?;
//! println!("{}: {}", WSSE_HEADER, token);
//! # Ok::<(), wolopay_auth::AuthError>(())
//! ```
//!
//! # Example: Verifying a Callback
//!
//! ```rust
//! use std::sync::Arc;
//! use wolopay_auth::{CallbackVerifier, Credentials};
//!
//! let verifier = CallbackVerifier::new(Arc::new(Credentials::new("client-id", "secret")?));
//!
//! let query = "transaction_id=42&status=200";
//! let header = verifier.sign(query)?;
//! assert!(verifier.is_valid(query, Some(&header)));
//! assert!(!verifier.is_valid(query, None));
//! # Ok::<(), wolopay_auth::AuthError>(())
//! ```
//!
//! # Legacy Digests
//!
//! The protocol fixes MD5 for nonces and SHA-1 for signatures. Both sit
//! behind [`LegacyDigest`]; do not replace them with stronger hashes, the
//! server would reject every request.

mod credentials;
mod digest;
mod entropy;
mod error;
mod query;
mod signature;
mod wsse;

pub use credentials::Credentials;
pub use digest::{LegacyDigest, Md5Digest, NONCE_DIGEST_LEN, SIGNATURE_DIGEST_LEN, Sha1Digest};
pub use entropy::{EntropySource, SeededEntropy, ThreadEntropy};
pub use error::{AuthError, AuthResult};
pub use query::{QueryParams, decode_component, encode_component, encode_form, parse_query};
pub use signature::{CallbackVerifier, headers, is_valid};
pub use wsse::{
    NONCE_SEED_LEN, WSSE_HEADER, WsseSigner, WsseToken, format_created, generate_token,
    password_digest,
};

/// Prelude for common imports.
///
/// ```
/// use wolopay_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::credentials::Credentials;
    pub use crate::error::{AuthError, AuthResult};
    pub use crate::query::{QueryParams, parse_query};
    pub use crate::signature::CallbackVerifier;
    pub use crate::wsse::{WSSE_HEADER, WsseSigner, WsseToken};
}
