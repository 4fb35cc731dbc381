//! Verified inbound callbacks

use wolopay_auth::{QueryParams, parse_query};

/// A callback whose signature has been verified.
///
/// Only [`WolopayClient::handle_callback`](crate::WolopayClient::handle_callback)
/// constructs one, so holding a `Callback` means the parameters came from
/// Wolopay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    params: QueryParams,
}

impl Callback {
    pub(crate) fn from_query(query: &str) -> Self {
        Self {
            params: parse_query(query),
        }
    }

    /// Decoded query parameters in order
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Look up a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// `transaction_id` parameter
    pub fn transaction_id(&self) -> Option<&str> {
        self.get("transaction_id")
    }

    /// `gamer_id` parameter
    pub fn gamer_id(&self) -> Option<&str> {
        self.get("gamer_id")
    }
}
