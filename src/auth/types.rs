//! Auth configuration types
//!
//! Credentials a client is configured with, the tokens it acquires, and the
//! form payloads of the OAuth2 grants.

use crate::decode::fields::{flexible_bool, null_default};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default scope requested by the client-credentials grant
pub const DEFAULT_SCOPE: &str = "read";

/// Credentials a client is configured with
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No credentials; only a stored or per-request token is used
    #[default]
    None,

    /// Pre-issued auth token, sent as `Bearer <token>`
    AuthToken {
        /// The token value
        token: String,
    },

    /// OAuth2 client id/secret, sent as HTTP Basic until a token is stored
    ClientCredentials {
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
    },

    /// Classic API key plus user credentials, exchanged at `/services/auth`
    Classic {
        /// API key
        api_key: String,
        /// Username
        username: String,
        /// Password
        password: String,
    },
}

impl AuthConfig {
    pub fn auth_token(token: impl Into<String>) -> Self {
        Self::AuthToken {
            token: token.into(),
        }
    }

    pub fn client_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::ClientCredentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn classic(
        api_key: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::Classic {
            api_key: api_key.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::AuthToken { .. } => f.debug_struct("AuthToken").finish_non_exhaustive(),
            Self::ClientCredentials { client_id, .. } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            Self::Classic { username, .. } => f
                .debug_struct("Classic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

/// How a single request should be authorized
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Use whatever the client has, by precedence
    #[default]
    Default,
    /// Send this bearer token instead of the client's credentials
    Bearer(String),
    /// Force HTTP Basic with the configured client id/secret
    Basic,
    /// Send no authorization header
    Anonymous,
}

/// OAuth2 token response
///
/// Only `access_token` is required; every other field may be missing or
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(deserialize_with = "null_default")]
    pub access_token: String,
    #[serde(default, deserialize_with = "null_default")]
    pub token_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub refresh_token: String,
    /// Lifetime in seconds, usually 3600
    #[serde(default, deserialize_with = "null_default")]
    pub expires_in: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub scope: String,
    #[serde(rename = "serviceId", default, deserialize_with = "null_default")]
    pub service_id: i64,
    #[serde(rename = "userId", default, deserialize_with = "null_default")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub jti: String,
    /// When this client received the token
    #[serde(skip, default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl AccessToken {
    /// Token with only a bearer value, for callers that already hold one
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            access_token: token.into(),
            token_type: "bearer".to_string(),
            refresh_token: String::new(),
            expires_in: 0,
            scope: String::new(),
            service_id: 0,
            user_id: 0,
            jti: String::new(),
            received_at: Utc::now(),
        }
    }

    /// Expiry instant, if the server reported a lifetime
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        (self.expires_in > 0).then(|| self.received_at + Duration::seconds(self.expires_in))
    }

    /// Check if the token has expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires_at) => Utc::now() + Duration::seconds(30) >= expires_at,
            None => false,
        }
    }

    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

/// Token held by a client after an explicit authenticate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredToken {
    /// OAuth2 access token, sent as `Bearer <token>`
    Access(AccessToken),
    /// Classic session token, sent as the raw header value
    Classic(String),
}

/// OAuth2 grants accepted by the token endpoint
#[derive(Clone, PartialEq, Eq)]
pub enum Grant {
    ClientCredentials {
        scope: String,
    },
    AuthorizationCode {
        code: String,
        scope: String,
        state: String,
        redirect_uri: String,
    },
    Password {
        scope: String,
        username: String,
        password: String,
    },
    RefreshToken {
        refresh_token: String,
    },
}

impl Grant {
    /// `grant_type` form value
    pub fn grant_type(&self) -> &'static str {
        match self {
            Self::ClientCredentials { .. } => "client_credentials",
            Self::AuthorizationCode { .. } => "authorization_code",
            Self::Password { .. } => "password",
            Self::RefreshToken { .. } => "refresh_token",
        }
    }

    /// Form fields posted to the token endpoint, in wire order
    pub fn form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![("grant_type", self.grant_type().to_string())];
        match self {
            Self::ClientCredentials { scope } => {
                form.push(("scope", scope.clone()));
            }
            Self::AuthorizationCode {
                code,
                scope,
                state,
                redirect_uri,
            } => {
                form.push(("code", code.clone()));
                form.push(("scope", scope.clone()));
                form.push(("state", state.clone()));
                form.push(("redirect_uri", redirect_uri.clone()));
            }
            Self::Password {
                scope,
                username,
                password,
            } => {
                form.push(("scope", scope.clone()));
                form.push(("username", username.clone()));
                form.push(("password", password.clone()));
            }
            Self::RefreshToken { refresh_token } => {
                form.push(("refresh_token", refresh_token.clone()));
            }
        }
        form
    }
}

impl fmt::Debug for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grant")
            .field("grant_type", &self.grant_type())
            .finish_non_exhaustive()
    }
}

/// Classic `/services/auth` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassicSession {
    #[serde(deserialize_with = "null_default")]
    pub user_id: String,
    #[serde(deserialize_with = "null_default")]
    pub group_id: String,
    #[serde(deserialize_with = "null_default")]
    pub org_id: String,
    #[serde(deserialize_with = "null_default")]
    pub contact_name: String,
    #[serde(deserialize_with = "null_default")]
    pub user_name: String,
    #[serde(deserialize_with = "flexible_bool")]
    pub active: bool,
    #[serde(deserialize_with = "flexible_bool")]
    pub validated: bool,
    #[serde(deserialize_with = "flexible_bool")]
    pub deleted: bool,
    #[serde(rename = "formStats", deserialize_with = "null_default")]
    pub form_status: String,
    #[serde(deserialize_with = "null_default")]
    pub last_modify: String,
    #[serde(deserialize_with = "flexible_bool")]
    pub no_mass_email: bool,
    #[serde(rename = "prefBBContact", deserialize_with = "null_default")]
    pub pref_bb_contact: String,
    #[serde(rename = "prefBBImage", deserialize_with = "null_default")]
    pub pref_bb_image: String,
    #[serde(deserialize_with = "null_default")]
    pub token: String,
}
