//! Request/response codec
//!
//! Builds requests against a tenant's base URL, attaches authorization,
//! dispatches them through the configured transport and classifies the
//! response before anything is decoded:
//! - status >= 400 becomes an upstream error
//! - a success with `Content-Length: 0` becomes `NoContent`
//! - `application/json` bodies go to serde_json, everything else to XML

use super::transport::{shared_transport, Transport};
use crate::auth::{AuthMode, Authenticator};
use crate::decode::{decode_as, encode_xml, DecoderFormat};
use crate::error::{Error, Result};
use crate::types::{ErrorResponse, Flavor, DEFAULT_DOMAIN, DEFAULT_TIMEOUT_SECS};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Request, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";
const XML_CONTENT_TYPE: &str = "application/xml";

/// Base URL of a tenant, e.g. `https://demo.memberclicks.net`
pub fn tenant_url(tenant: &str, domain: Option<&str>) -> String {
    format!("https://{tenant}.{}", domain.unwrap_or(DEFAULT_DOMAIN))
}

/// A classified successful response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub status: StatusCode,
    pub format: DecoderFormat,
    pub body: String,
}

impl Payload {
    /// Decode the body with the decoder its content type selected
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        decode_as(self.format, &self.body)
    }
}

/// HTTP codec shared by the current and classic clients
///
/// Cloning is cheap; clones share the transport and the stored token.
#[derive(Debug, Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    flavor: Flavor,
    authenticator: Authenticator,
    timeout: Duration,
    user_agent: Option<HeaderValue>,
}

impl HttpClient {
    /// Create a client on the shared default transport
    pub fn new(
        base_url: impl Into<String>,
        flavor: Flavor,
        authenticator: Authenticator,
    ) -> Result<Self> {
        Self::with_transport(base_url, flavor, authenticator, shared_transport()?)
    }

    /// Create a client on an injected transport
    pub fn with_transport(
        base_url: impl Into<String>,
        flavor: Flavor,
        authenticator: Authenticator,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url)?;
        Ok(Self {
            transport,
            base_url,
            flavor,
            authenticator,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
        })
    }

    /// Same client with a different per-request deadline
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Same client sending a custom `User-Agent`
    pub fn with_user_agent(mut self, agent: &str) -> Result<Self> {
        let value = HeaderValue::from_str(agent).map_err(|_| Error::InvalidHeader {
            name: USER_AGENT.to_string(),
        })?;
        self.user_agent = Some(value);
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Resolve `uri` against the base URL.
    ///
    /// `path`, `/path` and `{base}/path` all resolve to `{base}/path`. An
    /// absolute URL on any other origin keeps only its path and query, so
    /// requests and their credentials never leave the tenant host.
    pub fn url(&self, uri: &str) -> Result<Url> {
        let rest = match uri.strip_prefix(self.base_url.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with(['/', '?']) => rest.to_string(),
            _ if uri.starts_with("http://") || uri.starts_with("https://") => {
                let foreign = Url::parse(uri)?;
                debug!(url = %foreign, base = %self.base_url, "Rebasing absolute URL onto the tenant origin");
                match foreign.query() {
                    Some(query) => format!("{}?{query}", foreign.path()),
                    None => foreign.path().to_string(),
                }
            }
            _ => uri.to_string(),
        };
        Ok(Url::parse(&format!(
            "{}/{}",
            self.base_url,
            rest.trim_start_matches('/')
        ))?)
    }

    // ========================================================================
    // Request Builders
    // ========================================================================

    /// Parameterless GET
    pub fn get_request(&self, uri: &str) -> Result<Request> {
        self.request(Method::GET, uri)
    }

    /// Form-encoded POST
    pub fn form_request<I, K, V>(&self, uri: &str, form: I) -> Result<Request>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut encoder = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in form {
            encoder.append_pair(key.as_ref(), value.as_ref());
        }
        self.body_request(uri, FORM_CONTENT_TYPE, encoder.finish())
    }

    /// JSON POST
    pub fn json_request<B: Serialize + ?Sized>(&self, uri: &str, body: &B) -> Result<Request> {
        let body = serde_json::to_string(body)?;
        self.body_request(uri, JSON_CONTENT_TYPE, body)
    }

    /// XML POST with the body rooted at `root`
    pub fn xml_request<B: Serialize>(&self, uri: &str, root: &str, body: &B) -> Result<Request> {
        let body = encode_xml(root, body)?;
        self.body_request(uri, XML_CONTENT_TYPE, body)
    }

    fn body_request(&self, uri: &str, content_type: &'static str, body: String) -> Result<Request> {
        let mut request = self.request(Method::POST, uri)?;
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        *request.body_mut() = Some(body.into());
        Ok(request)
    }

    fn request(&self, method: Method, uri: &str) -> Result<Request> {
        let mut request = Request::new(method, self.url(uri)?);
        let headers = request.headers_mut();
        if self.flavor == Flavor::Classic {
            headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        if let Some(agent) = &self.user_agent {
            headers.insert(USER_AGENT, agent.clone());
        }
        Ok(request)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// GET `uri` with the client's own credentials and decode the result
    pub async fn get<T: DeserializeOwned>(&self, uri: &str) -> Result<T> {
        self.send(self.get_request(uri)?, &AuthMode::Default).await
    }

    /// Form POST to `uri` and decode the result
    pub async fn post_form<T, I, K, V>(&self, uri: &str, form: I, mode: &AuthMode) -> Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.send(self.form_request(uri, form)?, mode).await
    }

    /// JSON POST to `uri` and decode the result
    pub async fn post_json<T, B>(&self, uri: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.json_request(uri, body)?, &AuthMode::Default)
            .await
    }

    /// XML POST to `uri` and decode the result
    pub async fn post_xml<T, B>(&self, uri: &str, root: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.send(self.xml_request(uri, root, body)?, &AuthMode::Default)
            .await
    }

    /// Dispatch a built request and decode the classified body into `T`
    pub async fn send<T: DeserializeOwned>(&self, request: Request, mode: &AuthMode) -> Result<T> {
        self.execute(request, mode).await?.decode()
    }

    /// Dispatch a built request and classify the response without decoding
    pub async fn execute(&self, mut request: Request, mode: &AuthMode) -> Result<Payload> {
        self.authenticator.apply(&mut request, mode).await?;
        *request.timeout_mut() = Some(self.timeout);

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(method = %method, url = %url, "Sending request");

        let exchange = async {
            let response = self.transport.execute(request).await?;
            self.classify(response).await
        };

        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(payload)) => {
                debug!(method = %method, url = %url, status = payload.status.as_u16(), "Request succeeded");
                Ok(payload)
            }
            Ok(Err(Error::Http(e))) if e.is_timeout() => Err(Error::Timeout { timeout_ms }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(Error::Timeout { timeout_ms }),
        }
    }

    async fn classify(&self, response: Response) -> Result<Payload> {
        let status = response.status();
        let format = DecoderFormat::from_content_type(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );
        let content_length = response.content_length();
        let body = response.text().await?;

        if status.as_u16() >= 400 {
            let err = self.upstream_error(status, format, body);
            warn!(status = status.as_u16(), error = %err, "Upstream returned an error");
            return Err(err);
        }

        if content_length == Some(0) {
            return Err(Error::NoContent);
        }

        Ok(Payload {
            status,
            format,
            body,
        })
    }

    fn upstream_error(&self, status: StatusCode, format: DecoderFormat, body: String) -> Error {
        let status = status.as_u16();
        match self.flavor {
            Flavor::Classic => Error::upstream(status, format!("error: {body}")),
            Flavor::Current => {
                if format.is_json() {
                    if let Ok(response) = serde_json::from_str::<ErrorResponse>(&body) {
                        let message = if response.message.is_empty() {
                            body
                        } else {
                            response.message.clone()
                        };
                        return Error::Upstream {
                            status,
                            message,
                            response: Some(Box::new(response)),
                        };
                    }
                }
                Error::upstream(status, body)
            }
        }
    }
}
