//! Classic API client

use super::profile::{ClassicProfile, UserList};
use crate::auth::{AuthConfig, AuthMode, Authenticator, ClassicSession};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, Transport};
use crate::types::Flavor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Session endpoint
pub const AUTH_PATH: &str = "/services/auth";

/// User collection endpoint
pub const USER_PATH: &str = "/services/user";

/// Client for the classic token-header API
///
/// Every request carries `Accept: application/json`; once `auth` has
/// succeeded the session token is sent as the raw `Authorization` value.
#[derive(Debug, Clone)]
pub struct ClassicClient {
    http: HttpClient,
}

impl ClassicClient {
    /// Unauthenticated client on the shared default transport
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::new(
            config.endpoint(),
            Flavor::Classic,
            Authenticator::new(config.classic_auth_config()?),
        )?;
        Self::configured(http, config)
    }

    /// Unauthenticated client on an injected transport
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_transport(
            config.endpoint(),
            Flavor::Classic,
            Authenticator::new(config.classic_auth_config()?),
            transport,
        )?;
        Self::configured(http, config)
    }

    /// Build a client and open a session in one step
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.auth().await?;
        Ok(client)
    }

    fn configured(http: HttpClient, config: &ClientConfig) -> Result<Self> {
        let mut http = http.with_timeout(config.timeout());
        if let Some(agent) = &config.user_agent {
            http = http.with_user_agent(agent)?;
        }
        Ok(Self { http })
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// A view of this client with a different request timeout
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            http: self.http.clone().with_timeout(timeout),
        }
    }

    /// Exchange the API key and user credentials for a session token
    pub async fn auth(&self) -> Result<ClassicSession> {
        let AuthConfig::Classic {
            api_key,
            username,
            password,
        } = self.http.authenticator().config()
        else {
            return Err(Error::auth("classic credentials are not configured"));
        };

        let form = [
            ("apiKey", api_key.as_str()),
            ("username", username.as_str()),
            ("password", password.as_str()),
        ];
        let session: ClassicSession = self
            .http
            .post_form(AUTH_PATH, form, &AuthMode::Default)
            .await?;

        if session.token.is_empty() {
            return Err(Error::auth("session response carried no token"));
        }
        self.http
            .authenticator()
            .store_classic_token(session.token.clone())
            .await;
        Ok(session)
    }

    /// The current session token, if `auth` has succeeded
    pub async fn token(&self) -> Option<String> {
        self.http.authenticator().classic_token().await
    }

    // ========================================================================
    // Raw Requests
    // ========================================================================

    pub async fn get<T: DeserializeOwned>(&self, uri: &str) -> Result<T> {
        self.http.get(uri).await
    }

    pub async fn post_form<T, I, K, V>(&self, uri: &str, form: I) -> Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.http.post_form(uri, form, &AuthMode::Default).await
    }

    pub async fn post_json<T, B>(&self, uri: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.http.post_json(uri, body).await
    }

    /// XML POST; `root` names the document element
    pub async fn post_xml<T, B>(&self, uri: &str, root: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.http.post_xml(uri, root, body).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// List users, filtered by query parameters
    pub async fn users<I, K, V>(&self, params: I) -> Result<UserList>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            query.append_pair(key.as_ref(), value.as_ref());
        }
        let query = query.finish();

        let uri = if query.is_empty() {
            USER_PATH.to_string()
        } else {
            format!("{USER_PATH}?{query}")
        };
        self.http.get(&uri).await
    }

    /// A single user by id
    pub async fn user(&self, user_id: &str) -> Result<ClassicProfile> {
        self.http.get(&format!("{USER_PATH}/{user_id}")).await
    }
}
