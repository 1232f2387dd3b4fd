//! Network access for the cache worker

use crate::error::{CacheError, Result};
use crate::types::CacheResponse;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Fetches resources from the network
///
/// Non-success statuses are returned as responses, not errors; only
/// transport failures are errors.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<CacheResponse>;
}

/// `reqwest`-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    /// Create a fetcher with default timeouts
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Audiotour/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Use an existing client
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<CacheResponse> {
        debug!(url = %url, "Fetching");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                CacheError::Network(e.to_string())
            } else {
                CacheError::Request(e)
            }
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(CacheResponse {
            url: url.to_string(),
            status,
            content_type,
            body,
        })
    }
}
