//! Authenticator implementation
//!
//! Resolves configured credentials and stored tokens into an
//! `Authorization` header, and owns the stored token itself.

use super::types::{AccessToken, AuthConfig, AuthMode, StoredToken};
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Authenticator applies credentials to outgoing requests
///
/// Clones share the stored token.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Token stored by the last successful authenticate call
    stored: Arc<RwLock<Option<StoredToken>>>,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            stored: Arc::new(RwLock::new(None)),
        }
    }

    /// Create an authenticator that already holds an access token
    pub fn with_access_token(config: AuthConfig, token: AccessToken) -> Self {
        Self {
            config,
            stored: Arc::new(RwLock::new(Some(StoredToken::Access(token)))),
        }
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request.
    ///
    /// At most one `Authorization` header is set. Any header already present
    /// is replaced.
    pub async fn apply(&self, request: &mut Request, mode: &AuthMode) -> Result<()> {
        let value = match mode {
            AuthMode::Default => {
                let stored = self.stored.read().await;
                resolve_authorization(&self.config, stored.as_ref())
            }
            AuthMode::Bearer(token) => Some(format!("Bearer {token}")),
            AuthMode::Basic => self.basic_authorization(),
            AuthMode::Anonymous => None,
        };

        let headers = request.headers_mut();
        headers.remove(AUTHORIZATION);
        if let Some(value) = value {
            let mut value = HeaderValue::from_str(&value).map_err(|_| Error::InvalidHeader {
                name: AUTHORIZATION.to_string(),
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }

    /// Basic header from the configured client credentials, if any
    pub fn basic_authorization(&self) -> Option<String> {
        match &self.config {
            AuthConfig::ClientCredentials {
                client_id,
                client_secret,
            } if !client_id.is_empty() && !client_secret.is_empty() => {
                Some(basic_header(client_id, client_secret))
            }
            _ => None,
        }
    }

    /// Store an OAuth2 access token for later requests
    pub async fn store_access_token(&self, token: AccessToken) {
        info!(
            token_type = %token.token_type,
            expires_in = token.expires_in,
            "Stored access token"
        );
        *self.stored.write().await = Some(StoredToken::Access(token));
    }

    /// Store a classic session token for later requests
    pub async fn store_classic_token(&self, token: String) {
        info!("Stored classic session token");
        *self.stored.write().await = Some(StoredToken::Classic(token));
    }

    /// The stored OAuth2 access token, if any
    pub async fn access_token(&self) -> Option<AccessToken> {
        match self.stored.read().await.as_ref() {
            Some(StoredToken::Access(token)) => Some(token.clone()),
            _ => None,
        }
    }

    /// The stored classic session token, if any
    pub async fn classic_token(&self) -> Option<String> {
        match self.stored.read().await.as_ref() {
            Some(StoredToken::Classic(token)) => Some(token.clone()),
            _ => None,
        }
    }

    /// Whether an authenticate call has stored a token
    pub async fn is_authenticated(&self) -> bool {
        self.stored.read().await.is_some()
    }

    /// Drop the stored token
    pub async fn clear(&self) {
        *self.stored.write().await = None;
    }
}

/// Pick the `Authorization` value for a request.
///
/// Precedence: stored token, then a configured auth token, then HTTP Basic
/// with client credentials, then nothing. Classic session tokens are sent
/// without a scheme prefix.
pub fn resolve_authorization(config: &AuthConfig, stored: Option<&StoredToken>) -> Option<String> {
    if let Some(stored) = stored {
        return Some(match stored {
            StoredToken::Access(token) => format!("Bearer {}", token.access_token),
            StoredToken::Classic(token) => token.clone(),
        });
    }

    match config {
        AuthConfig::AuthToken { token } if !token.is_empty() => Some(format!("Bearer {token}")),
        AuthConfig::ClientCredentials {
            client_id,
            client_secret,
        } if !client_id.is_empty() && !client_secret.is_empty() => {
            Some(basic_header(client_id, client_secret))
        }
        _ => None,
    }
}

fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}
