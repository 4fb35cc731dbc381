//! Client configuration

use crate::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use wolopay_auth::Credentials;

/// Production API root
pub const PRODUCTION_URL: &str = "https://wolopay.com/api/v1/";

/// Sandbox API root
pub const SANDBOX_URL: &str = "https://sandbox.wolopay.com/api/v1/";

/// Wolopay environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Live payments
    #[default]
    Production,
    /// Test payments
    Sandbox,
}

impl Environment {
    /// Pick the environment from a sandbox flag
    pub fn from_sandbox(sandbox: bool) -> Self {
        if sandbox { Self::Sandbox } else { Self::Production }
    }

    /// API root for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_URL,
            Self::Sandbox => SANDBOX_URL,
        }
    }

    /// Is this the sandbox
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Self::Sandbox)
    }
}

/// Immutable client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Client id and shared secret
    pub credentials: Arc<Credentials>,
    /// Target environment
    pub environment: Environment,
    /// Log request bodies and response payloads
    pub debug: bool,
    /// Proxy URL for all traffic
    pub proxy: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// API root overriding the environment's
    pub base_url: Option<String>,
}

impl ClientConfig {
    /// Production configuration with defaults
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> ClientResult<Self> {
        Self::builder().credentials(client_id, secret).build()
    }

    /// Sandbox configuration with defaults
    pub fn sandbox(client_id: impl Into<String>, secret: impl Into<String>) -> ClientResult<Self> {
        Self::builder()
            .credentials(client_id, secret)
            .environment(Environment::Sandbox)
            .build()
    }

    /// Create a configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Build configuration from environment variables.
    ///
    /// - `WOLOPAY_CLIENT_ID`, `WOLOPAY_SECRET` (required)
    /// - `WOLOPAY_SANDBOX=1|true`
    /// - `WOLOPAY_DEBUG=1|true`
    /// - `WOLOPAY_PROXY=<url>`
    /// - `WOLOPAY_TIMEOUT_SECS=<n>`
    pub fn from_env() -> ClientResult<Self> {
        let client_id = env::var("WOLOPAY_CLIENT_ID")
            .map_err(|_| ClientError::Config("WOLOPAY_CLIENT_ID is not set".into()))?;
        let secret = env::var("WOLOPAY_SECRET")
            .map_err(|_| ClientError::Config("WOLOPAY_SECRET is not set".into()))?;

        let mut builder = Self::builder()
            .credentials(client_id, secret)
            .environment(Environment::from_sandbox(env_flag("WOLOPAY_SANDBOX")))
            .debug(env_flag("WOLOPAY_DEBUG"));

        if let Ok(proxy) = env::var("WOLOPAY_PROXY") {
            builder = builder.proxy(proxy);
        }

        if let Ok(secs) = env::var("WOLOPAY_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ClientError::Config(format!("WOLOPAY_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Effective API root
    pub fn api_root(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Builder for [`ClientConfig`]
#[derive(Debug)]
pub struct ClientConfigBuilder {
    client_id: Option<String>,
    secret: Option<String>,
    environment: Environment,
    debug: bool,
    proxy: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
    base_url: Option<String>,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            client_id: None,
            secret: None,
            environment: Environment::Production,
            debug: false,
            proxy: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("wolopay-client/{}", env!("CARGO_PKG_VERSION")),
            base_url: None,
        }
    }
}

impl ClientConfigBuilder {
    /// Set the client id and shared secret
    pub fn credentials(mut self, client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self.secret = Some(secret.into());
        self
    }

    /// Set the environment
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Use the sandbox
    pub fn sandbox(self, sandbox: bool) -> Self {
        self.environment(Environment::from_sandbox(sandbox))
    }

    /// Enable payload logging
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Route traffic through a proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent string
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the API root, e.g. for a local mock server
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientResult<ClientConfig> {
        let client_id = self
            .client_id
            .ok_or_else(|| ClientError::Config("client id is required".into()))?;
        let secret = self
            .secret
            .ok_or_else(|| ClientError::Config("secret is required".into()))?;

        // Relative paths are joined onto the root, which must end in '/'
        let base_url = self.base_url.map(|mut url| {
            if !url.ends_with('/') {
                url.push('/');
            }
            url
        });

        Ok(ClientConfig {
            credentials: Arc::new(Credentials::new(client_id, secret)?),
            environment: self.environment,
            debug: self.debug,
            proxy: self.proxy,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self.user_agent,
            base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_urls() {
        assert_eq!(Environment::Sandbox.base_url(), "https://sandbox.wolopay.com/api/v1/");
        assert_eq!(Environment::Production.base_url(), "https://wolopay.com/api/v1/");
        assert_eq!(Environment::from_sandbox(true), Environment::Sandbox);
        assert_eq!(Environment::default(), Environment::Production);
    }

    #[test]
    fn test_new_and_sandbox() {
        let production = ClientConfig::new("clientId", "secret").unwrap();
        assert_eq!(production.api_root(), PRODUCTION_URL);
        assert!(!production.debug);

        let sandbox = ClientConfig::sandbox("clientId", "secret").unwrap();
        assert_eq!(sandbox.api_root(), SANDBOX_URL);
        assert!(sandbox.environment.is_sandbox());
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .credentials("clientId", "secret")
            .sandbox(true)
            .debug(true)
            .timeout(Duration::from_secs(5))
            .base_url("http://127.0.0.1:8080/api/v1")
            .build()
            .unwrap();

        assert!(config.debug);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.api_root(), "http://127.0.0.1:8080/api/v1/");
        assert_eq!(config.credentials.client_id(), "clientId");
    }

    #[test]
    fn test_builder_requires_credentials() {
        assert!(matches!(
            ClientConfig::builder().build(),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::new("", "secret"),
            Err(ClientError::Signing(_))
        ));
    }

    #[test]
    fn test_from_env() {
        unsafe {
            env::set_var("WOLOPAY_CLIENT_ID", "env-client");
            env::set_var("WOLOPAY_SECRET", "env-secret");
            env::set_var("WOLOPAY_SANDBOX", "true");
            env::set_var("WOLOPAY_TIMEOUT_SECS", "12");
        }

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.credentials.client_id(), "env-client");
        assert!(config.environment.is_sandbox());
        assert_eq!(config.timeout, Duration::from_secs(12));

        unsafe {
            env::set_var("WOLOPAY_TIMEOUT_SECS", "soon");
        }
        assert!(matches!(ClientConfig::from_env(), Err(ClientError::Config(_))));

        unsafe {
            env::remove_var("WOLOPAY_CLIENT_ID");
            env::remove_var("WOLOPAY_SECRET");
            env::remove_var("WOLOPAY_SANDBOX");
            env::remove_var("WOLOPAY_TIMEOUT_SECS");
        }
        assert!(matches!(ClientConfig::from_env(), Err(ClientError::Config(_))));
    }
}
