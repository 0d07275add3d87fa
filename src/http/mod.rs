//! HTTP module
//!
//! Request construction, dispatch and response classification on top of a
//! swappable transport.
//!
//! # Features
//!
//! - **Injectable Transport**: any `Transport` impl, or a lazily built shared default
//! - **Idempotent URLs**: bare, `/`-prefixed and fully-qualified paths resolve alike
//! - **Response Classification**: upstream errors, empty bodies, JSON vs XML
//! - **Deadlines**: a per-client request timeout, 10 s unless overridden

mod client;
mod transport;

pub use client::{tenant_url, HttpClient, Payload};
pub use transport::{shared_transport, ReqwestTransport, Transport, DEFAULT_USER_AGENT};
