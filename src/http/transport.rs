//! Request executors
//!
//! A `Transport` sends a fully built request and hands back the raw response.
//! Clients hold one behind an `Arc`, so tests and proxies can swap it out.

use crate::error::Result;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::{Client, Request, Response};
use std::fmt;
use std::sync::Arc;

/// User agent sent by the default transport
pub const DEFAULT_USER_AGENT: &str = concat!("memberclicks-rs/", env!("CARGO_PKG_VERSION"));

static SHARED: OnceCell<Arc<dyn Transport>> = OnceCell::new();

/// Something that can execute an HTTP request
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send the request and return the response, whatever its status
    async fn execute(&self, request: Request) -> Result<Response>;
}

/// Transport backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with its own connection pool
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        Ok(self.client.execute(request).await?)
    }
}

/// Process-wide transport, built on first use
pub fn shared_transport() -> Result<Arc<dyn Transport>> {
    SHARED
        .get_or_try_init(|| {
            ReqwestTransport::new(DEFAULT_USER_AGENT).map(|t| Arc::new(t) as Arc<dyn Transport>)
        })
        .cloned()
}
