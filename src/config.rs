//! Client configuration
//!
//! A `ClientConfig` names the tenant, how to reach it and which credentials
//! to use. It can be built in code, parsed from YAML or JSON, or read from
//! `MEMBERCLICKS_*` environment variables.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::tenant_url;
use crate::types::{DEFAULT_DOMAIN, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "MEMBERCLICKS_";

// ============================================================================
// Client Config
// ============================================================================

/// Everything needed to construct a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Tenant (organization) id, the subdomain of the base URL
    #[serde(alias = "org_id")]
    pub tenant: String,

    /// Domain the tenant subdomain hangs off
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Full base URL, replacing `https://{tenant}.{domain}` (tests, proxies)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Custom `User-Agent`
    #[serde(default)]
    pub user_agent: Option<String>,

    #[serde(default)]
    pub credentials: Credentials,
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Credentials for either API generation; all optional
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub auth_token: Option<String>,
    pub api_key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ClientConfig {
    /// Config for `tenant` with defaults and no credentials
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            domain: default_domain(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            credentials: Credentials::default(),
        }
    }

    /// Create a new config builder
    pub fn builder(tenant: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::new(tenant),
        }
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(Error::config(format!(
                "Unsupported config file extension: '{}'",
                path.display()
            ))),
        }
    }

    /// Read `MEMBERCLICKS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from a variable lookup; `from_env` with the environment swapped out
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}")).filter(|value| !value.is_empty())
        };

        let tenant = var("ORG_ID").ok_or_else(|| Error::missing_field("MEMBERCLICKS_ORG_ID"))?;
        let mut config = Self::new(tenant);

        if let Some(timeout) = var("TIMEOUT_SECS") {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::config(format!("MEMBERCLICKS_TIMEOUT_SECS is not a number: '{timeout}'"))
            })?;
        }

        config.credentials = Credentials {
            client_id: var("CLIENT_ID"),
            client_secret: var("CLIENT_SECRET"),
            auth_token: var("AUTH_TOKEN"),
            api_key: var("API_KEY"),
            username: var("USERNAME"),
            password: var("PASSWORD"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configs no client could use
    pub fn validate(&self) -> Result<()> {
        if self.tenant.trim().is_empty() {
            return Err(Error::config("Tenant cannot be empty"));
        }

        if self.timeout_secs == 0 {
            return Err(Error::config("Timeout must be greater than zero"));
        }

        if let Some(base_url) = &self.base_url {
            url::Url::parse(base_url)?;
        }

        Ok(())
    }

    /// Base URL requests are resolved against
    pub fn endpoint(&self) -> String {
        match &self.base_url {
            Some(base_url) => base_url.clone(),
            None => tenant_url(&self.tenant, Some(&self.domain)),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Credentials for the OAuth2 API: an auth token wins over a client id/secret
    pub fn auth_config(&self) -> AuthConfig {
        let creds = &self.credentials;
        if let Some(token) = &creds.auth_token {
            return AuthConfig::auth_token(token.clone());
        }
        match (&creds.client_id, &creds.client_secret) {
            (Some(id), Some(secret)) => AuthConfig::client_credentials(id.clone(), secret.clone()),
            _ => AuthConfig::None,
        }
    }

    /// Credentials for the classic API; all three parts are required
    pub fn classic_auth_config(&self) -> Result<AuthConfig> {
        let creds = &self.credentials;
        let api_key = creds
            .api_key
            .clone()
            .ok_or_else(|| Error::missing_field("credentials.api_key"))?;
        let username = creds
            .username
            .clone()
            .ok_or_else(|| Error::missing_field("credentials.username"))?;
        let password = creds
            .password
            .clone()
            .ok_or_else(|| Error::missing_field("credentials.password"))?;
        Ok(AuthConfig::classic(api_key, username, password))
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ClientConfig`]
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.config.domain = domain.into();
        self
    }

    /// Override the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    ///
    /// Stored in whole seconds, rounded up, so any non-zero duration stays
    /// valid. Use `Client::with_timeout` for sub-second deadlines.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let extra = u64::from(timeout.subsec_nanos() > 0);
        self.config.timeout_secs = timeout.as_secs().saturating_add(extra);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Set OAuth2 client credentials
    pub fn client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.config.credentials.client_id = Some(client_id.into());
        self.config.credentials.client_secret = Some(client_secret.into());
        self
    }

    /// Set a pre-issued auth token
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.config.credentials.auth_token = Some(token.into());
        self
    }

    /// Set classic API credentials
    pub fn classic(
        mut self,
        api_key: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config.credentials.api_key = Some(api_key.into());
        self.config.credentials.username = Some(username.into());
        self.config.credentials.password = Some(password.into());
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
