//! Classic API module
//!
//! The legacy `/services/*` API: an API key plus user credentials buy a
//! session token, which is then sent verbatim in `Authorization`. Responses
//! are XML unless the server answers with JSON.

mod client;
mod profile;

pub use client::{ClassicClient, AUTH_PATH, USER_PATH};
pub use profile::{Attribute, AttributeType, ClassicProfile, UserList};
