//! HTTP fetch capability
//!
//! Resolvers never talk to `reqwest` directly. They receive an
//! `Arc<dyn HttpFetcher>` so that every pipeline can be driven by canned
//! responses in tests.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::HttpConfig;
use crate::error::{ParserError, Result, MAX_RESPONSE_SIZE};

/// Shared HTTP client used when no explicit configuration is given.
/// Automatic `Referer` on redirects is disabled; resolvers set it themselves.
static SHARED_CLIENTS: LazyLock<ClientPair> = LazyLock::new(|| {
    ClientPair::build(&HttpConfig::default()).expect("Failed to build shared link parser HTTP client")
});

fn build_client(config: &HttpConfig, redirect: Policy) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(config.connect_timeout())
        .timeout(config.timeout())
        .pool_max_idle_per_host(10)
        .redirect(redirect)
        .referer(false)
        .build()?)
}

/// reqwest fixes the redirect policy per client, so manual hops get their own
#[derive(Debug, Clone)]
struct ClientPair {
    following: Client,
    manual: Client,
}

impl ClientPair {
    fn build(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            following: build_client(config, Policy::limited(config.max_redirects))?,
            manual: build_client(config, Policy::none())?,
        })
    }
}

/// A single GET request issued by a resolver
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub headers: HeaderMap,
    /// Only status, headers and final URL are wanted (e.g. media files)
    pub discard_body: bool,
    /// When false, a 3xx is returned as-is for the caller to follow
    pub follow_redirects: bool,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HeaderMap::new(),
            discard_body: false,
            follow_redirects: true,
        }
    }

    #[must_use]
    pub fn discard_body(mut self) -> Self {
        self.discard_body = true;
        self
    }

    #[must_use]
    pub fn no_redirect(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Add a header, rejecting values that are not valid header text
    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self> {
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }
}

/// Fully read response
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// URL the response was finally served from, after redirects
    pub final_url: Option<String>,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            final_url: None,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
        self.headers.insert(name, HeaderValue::from_static(value));
        self
    }

    #[must_use]
    pub fn with_final_url(mut self, url: impl Into<String>) -> Self {
        self.final_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Declared `Content-Type`, verbatim
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Whether the declared media type is `application/json`, ignoring parameters
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
    }

    /// `Location` of a 3xx response, unresolved
    #[must_use]
    pub fn redirect_location(&self) -> Option<&str> {
        if !self.status.is_redirection() {
            return None;
        }
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }

    /// Check HTTP status before processing body.
    pub fn check_status(self, url: &str) -> Result<Self> {
        if self.status.is_client_error() || self.status.is_server_error() {
            return Err(ParserError::Http {
                status: self.status,
                url: self.final_url.unwrap_or_else(|| url.to_string()),
            });
        }
        Ok(self)
    }
}

/// Capability to issue GET requests with custom headers
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse>;
}

pub type SharedFetcher = Arc<dyn HttpFetcher>;

/// `HttpFetcher` backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    clients: ClientPair,
}

impl ReqwestFetcher {
    /// Build a dedicated client from configuration
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            clients: ClientPair::build(config)?,
        })
    }

    /// Reuse the shared connection pool with default settings
    #[must_use]
    pub fn shared() -> Self {
        Self {
            clients: SHARED_CLIENTS.clone(),
        }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::shared()
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let client = if request.follow_redirects {
            &self.clients.following
        } else {
            &self.clients.manual
        };
        let response = client
            .get(&request.url)
            .headers(request.headers)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = Some(response.url().to_string());

        if request.discard_body {
            return Ok(FetchResponse {
                status,
                headers,
                final_url,
                body: String::new(),
            });
        }

        if let Some(cl) = response.content_length() {
            if cl as usize > MAX_RESPONSE_SIZE {
                return Err(ParserError::ResponseTooLarge { size: cl });
            }
        }

        let bytes = response.bytes().await?;
        if bytes.len() > MAX_RESPONSE_SIZE {
            return Err(ParserError::ResponseTooLarge { size: bytes.len() as u64 });
        }

        Ok(FetchResponse {
            status,
            headers,
            final_url,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}
