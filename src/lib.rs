// Wolopay - payment API integration for Rust
//
// Signing and verification live in `wolopay-auth`; the async REST client
// lives in `wolopay-client` behind the `client` feature.

// Re-export the signing core
pub use wolopay_auth::*;

// Re-export optional crates
#[cfg(feature = "client")]
pub use wolopay_client;

#[cfg(feature = "client")]
pub use wolopay_client::{
    Callback, ClientConfig, ClientConfigBuilder, ClientError, ClientResult, Environment,
    Transaction, TransactionRequest, WolopayClient,
};

/// Prelude for common imports.
///
/// ```
/// use wolopay::prelude::*;
/// ```
pub mod prelude {
    pub use wolopay_auth::prelude::*;

    #[cfg(feature = "client")]
    pub use wolopay_client::prelude::*;
}
