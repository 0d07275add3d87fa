// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # MemberClicks client
//!
//! Async client for the MemberClicks membership platform, covering both API
//! generations.
//!
//! ## Features
//!
//! - **OAuth2 API**: client-credentials, password, refresh and authorization-code grants
//! - **Classic API**: API-key session tokens, XML or JSON responses
//! - **Dynamic Profiles**: tenant-defined fields behind typed accessors
//! - **Aggregation**: fetch every page of a listing or saved search in one call
//! - **Injectable Transport**: swap the HTTP executor for tests or proxies
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use memberclicks::{Client, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder("demo")
//!         .client_credentials("client-id", "client-secret")
//!         .build();
//!     let client = Client::new(&config)?;
//!
//!     client.auth().await?;
//!
//!     // page 0 fetches every page
//!     let all = client.profiles(0, 100).await?;
//!     for profile in &all.profiles {
//!         println!("{} {}", profile.id(), profile.member_type());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │            Client (OAuth2)        ClassicClient (token)      │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬──────────────┬───┴─────────┬──────────────────────┐
//! │ Pagination│  Resources   │  Profiles   │   Classic records    │
//! ├───────────┴──────────────┴─────────────┴──────────────────────┤
//! │        HttpClient: URLs, auth, classification, decoding       │
//! ├───────────────────────────────┬───────────────────────────────┤
//! │         Authenticator         │     Transport (reqwest)       │
//! └───────────────────────────────┴───────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credential strategies and token storage
pub mod auth;

/// Request construction, transport and response classification
pub mod http;

/// Response decoders (JSON, XML)
pub mod decode;

/// Dynamic profile record
pub mod profile;

/// Profile pages, aggregation and saved searches
pub mod pagination;

/// Events, groups, countries, member types and statuses
pub mod resources;

/// Client configuration
pub mod config;

/// OAuth2 API client
pub mod client;

/// Classic API client and records
pub mod classic;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{AccessToken, AuthConfig};
pub use classic::{ClassicClient, ClassicProfile};
pub use client::Client;
pub use config::{ClientConfig, Credentials};
pub use http::{ReqwestTransport, Transport};
pub use pagination::{ProfilePage, SearchHandle};
pub use profile::{AttrValue, Profile, ProfileRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
