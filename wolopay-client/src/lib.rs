//! # Wolopay Client
//!
//! Async client for the Wolopay payment API.
//!
//! ## Features
//!
//! - **Signed Requests**: every call carries a fresh `X-WSSE` UsernameToken
//! - **Transactions**: create, fetch and poll transactions
//! - **Gamers and Promo Codes**: register gamers, manage promotional codes
//! - **Callbacks**: verify and parse signed server callbacks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wolopay_client::{ClientConfig, TransactionRequest, WolopayClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WolopayClient::new(ClientConfig::sandbox("client-id", "secret")?)?;
//!
//!     let request = TransactionRequest::new("gamer-42", "3").field("country", "RU");
//!     let url = client.create_transaction_url(&request).await?;
//!     println!("Redirect the gamer to {}", url);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Handling Callbacks
//!
//! ```rust,no_run
//! use wolopay_client::{ClientConfig, HeaderMap, WolopayClient};
//!
//! # fn handle(query: Option<&str>, headers: &HeaderMap) -> Result<(), Box<dyn std::error::Error>> {
//! let client = WolopayClient::new(ClientConfig::from_env()?)?;
//!
//! let callback = client.handle_callback(query, headers)?;
//! if let Some(id) = callback.transaction_id() {
//!     println!("Transaction {} changed", id);
//! }
//! # Ok(())
//! # }
//! ```

mod callback;
mod client;
mod config;
mod error;
mod transaction;

pub use callback::Callback;
pub use client::{FormFields, WolopayClient};
pub use config::{ClientConfig, ClientConfigBuilder, Environment, PRODUCTION_URL, SANDBOX_URL};
pub use error::{ClientError, ClientResult};
pub use transaction::{STATUS_COMPLETED, Transaction, TransactionRequest};

// Re-export common types
pub use reqwest::header::HeaderMap;
pub use url::Url;
pub use wolopay_auth;

/// Prelude for common imports.
///
/// ```
/// use wolopay_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::callback::Callback;
    pub use crate::client::WolopayClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::error::{ClientError, ClientResult};
    pub use crate::transaction::{Transaction, TransactionRequest};
}
