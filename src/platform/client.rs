//! HTTP client for thumbnail host requests

use crate::error::ThumbError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

/// Default User-Agent sent to the thumbnail host
pub const DEFAULT_USER_AGENT: &str = concat!("cyberthum/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Request timeout; no timeout is applied when unset
    pub timeout: Option<Duration>,
    /// User agent string
    pub user_agent: Option<String>,
    /// Proxy URL
    pub proxy_url: Option<String>,
}

/// Thumbnail host HTTP client
#[derive(Debug, Clone)]
pub struct ThumbnailClient {
    client: Client,
}

impl ThumbnailClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, ThumbError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self, ThumbError> {
        let mut builder = ClientBuilder::new().gzip(true).brotli(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        builder = builder.user_agent(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));

        if let Some(proxy_url) = &config.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let client = builder.build()?;
        debug!("Built HTTP client: {:?}", config);

        Ok(Self { client })
    }

    /// Plain GET with the runtime's default headers
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }
}
