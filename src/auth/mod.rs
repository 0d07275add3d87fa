//! Authentication module
//!
//! Supports: stored bearer access token, static auth token, OAuth2 client
//! credentials (HTTP Basic), classic API-key session token.
//!
//! The `Authenticator` applies exactly one strategy per request and holds the
//! token stored by an explicit authenticate call. Tokens are never refreshed
//! automatically.

mod authenticator;
mod types;

pub use authenticator::{resolve_authorization, Authenticator};
pub use types::{
    AccessToken, AuthConfig, AuthMode, ClassicSession, Grant, StoredToken, DEFAULT_SCOPE,
};
