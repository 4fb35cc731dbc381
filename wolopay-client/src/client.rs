//! Wolopay REST client.

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};
use url::Url;
use wolopay_auth::{CallbackVerifier, WSSE_HEADER, WsseSigner, encode_component, encode_form};

use crate::transaction::json_kind;
use crate::{Callback, ClientConfig, ClientError, ClientResult, Transaction, TransactionRequest};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Form fields of an outbound request; a `None` value is sent as a bare key.
pub type FormFields = [(String, Option<String>)];

/// Client for the Wolopay API.
///
/// Every request is signed with a fresh `X-WSSE` token. Cloning is cheap
/// and clones share the connection pool.
#[derive(Clone)]
pub struct WolopayClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    base_url: Url,
    signer: WsseSigner,
    verifier: CallbackVerifier,
}

impl WolopayClient {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| ClientError::Config(format!("invalid proxy {proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let http = builder.build()?;
        let base_url = Url::parse(config.api_root())?;
        let signer = WsseSigner::new(Arc::clone(&config.credentials));
        let verifier = CallbackVerifier::new(Arc::clone(&config.credentials));

        debug!(
            base_url = %base_url,
            client_id = config.credentials.client_id(),
            "Wolopay client initialized"
        );

        Ok(Self {
            http,
            config: Arc::new(config),
            base_url,
            signer,
            verifier,
        })
    }

    /// Replace the request signer, e.g. with seeded entropy in tests
    pub fn with_signer(mut self, signer: WsseSigner) -> Self {
        self.signer = signer;
        self
    }

    /// API root requests are resolved against
    pub fn environment_url(&self) -> &Url {
        &self.base_url
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a transaction.
    ///
    /// POSTs `transaction.json` and returns the created transaction object.
    pub async fn create_transaction(&self, request: &TransactionRequest) -> ClientResult<Transaction> {
        let value = self
            .request(Method::POST, "transaction.json", Some(request.fields()))
            .await?;
        Transaction::from_value(value)
    }

    /// Create a transaction and return its payment page URL.
    pub async fn create_transaction_url(&self, request: &TransactionRequest) -> ClientResult<String> {
        let transaction = self.create_transaction(request).await?;
        transaction
            .url()
            .map(str::to_owned)
            .ok_or_else(|| ClientError::UnexpectedResponse("transaction has no url".into()))
    }

    /// Fetch a transaction by id
    pub async fn get_transaction(&self, transaction_id: &str) -> ClientResult<Transaction> {
        let path = format!("transaction.json?transaction_id={}", encode_component(transaction_id));
        let value = self.request(Method::GET, &path, None).await?;
        Transaction::from_value(value)
    }

    /// Fetch extended transaction information by id
    pub async fn get_transaction_info(&self, transaction_id: &str) -> ClientResult<Transaction> {
        let path = format!(
            "transaction/info.json?transaction_id={}",
            encode_component(transaction_id)
        );
        let value = self.request(Method::GET, &path, None).await?;
        Transaction::from_value(value)
    }

    /// Whether a transaction is completed.
    ///
    /// A transaction without a readable status category counts as not
    /// completed; transport and API errors are returned.
    pub async fn is_transaction_completed(&self, transaction_id: &str) -> ClientResult<bool> {
        Ok(self.get_transaction(transaction_id).await?.is_completed())
    }

    /// Register a gamer
    pub async fn create_gamer(&self, gamer_id: &str) -> ClientResult<Value> {
        let form = [("gamer_id".to_string(), Some(gamer_id.to_string()))];
        self.request(Method::POST, "gamer.json", Some(form.as_slice())).await
    }

    /// Create a promotional code for an article
    pub async fn create_promotional_code(
        &self,
        promo_code: &str,
        article_id: &str,
    ) -> ClientResult<Value> {
        let form = promo_form(promo_code, article_id);
        self.request(Method::POST, "promo_code.json", Some(form.as_slice()))
            .await
    }

    /// Update the article a promotional code applies to
    pub async fn update_promotional_code(
        &self,
        promo_code: &str,
        article_id: &str,
    ) -> ClientResult<Value> {
        let form = promo_form(promo_code, article_id);
        self.request(Method::PUT, "promo_code.json", Some(form.as_slice()))
            .await
    }

    /// Check the `Authorization` header of an inbound callback.
    pub fn verify_callback(&self, query: Option<&str>, headers: &HeaderMap) -> bool {
        self.verifier.verify_headers(query, headers)
    }

    /// Verify an inbound callback and parse its parameters.
    pub fn handle_callback(&self, query: Option<&str>, headers: &HeaderMap) -> ClientResult<Callback> {
        if !self.verify_callback(query, headers) {
            return Err(ClientError::InvalidCallbackSignature);
        }
        Ok(Callback::from_query(query.unwrap_or("")))
    }

    /// Send a signed request and parse the JSON response.
    async fn request(
        &self,
        method: Method,
        path: &str,
        form: Option<&FormFields>,
    ) -> ClientResult<Value> {
        let url = self.base_url.join(path)?;
        let token = self.signer.token()?;

        debug!(method = %method, url = %url, "Sending Wolopay request");

        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header(WSSE_HEADER, token.to_string());

        if let Some(form) = form {
            let body = encode_form(form.iter().map(|(k, v)| (k.as_str(), v.as_deref())));
            if self.config.debug {
                debug!(url = %url, body = %body, "Request body");
            }
            builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(method = %method, url = %url, error = %e, "Wolopay request failed");
            ClientError::Network(e)
        })?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Received Wolopay response");

        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "Wolopay returned an error status");
            if self.config.debug {
                debug!(url = %url, body = %body, "Error body");
            }
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if self.config.debug {
            debug!(url = %url, payload = %String::from_utf8_lossy(&bytes), "Response payload");
        }

        let value: Value = serde_json::from_slice(&bytes)?;
        debug!(url = %url, kind = json_kind(&value), "Parsed Wolopay response");
        Ok(value)
    }
}

fn promo_form(promo_code: &str, article_id: &str) -> [(String, Option<String>); 2] {
    [
        ("promo_code".to_string(), Some(promo_code.to_string())),
        ("article_id".to_string(), Some(article_id.to_string())),
    ]
}

impl std::fmt::Debug for WolopayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WolopayClient")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.config.credentials.client_id())
            .field("debug", &self.config.debug)
            .finish()
    }
}
