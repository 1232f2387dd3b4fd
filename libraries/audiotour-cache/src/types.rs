//! Requests, responses and worker messages

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use url::Url;

pub use reqwest::Method;

/// Request intercepted by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRequest {
    pub method: Method,
    pub url: Url,
}

impl CacheRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }
}

/// Stored or fetched response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheResponse {
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl CacheResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            url: url.into(),
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// Set the content type
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Status in the 2xx range
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where a served response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    Network,
}

/// Worker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkerState {
    /// Created, nothing cached yet
    #[default]
    Parsed,
    Installing,
    /// Precache done, waiting to activate
    Installed,
    Activated,
    /// Static precache failed
    Redundant,
}

/// Messages posted to the worker by the page
///
/// JSON shape: `{"type": "SKIP_WAITING"}` or
/// `{"type": "CACHE_AUDIO", "urls": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    SkipWaiting,
    CacheAudio { urls: Vec<String> },
}

impl WorkerMessage {
    /// Parse a posted JSON message
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Outcome of caching a list of audio URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecacheReport {
    pub cached: Vec<String>,
    pub failed: Vec<String>,
}

/// Outcome of `install`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub static_cached: usize,
    pub audio: PrecacheReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_statuses() {
        assert!(CacheResponse::new("/", 200, "").is_ok());
        assert!(CacheResponse::new("/", 204, "").is_ok());
        assert!(!CacheResponse::new("/", 304, "").is_ok());
        assert!(!CacheResponse::new("/", 404, "").is_ok());
    }

    #[test]
    fn messages_from_page() {
        assert_eq!(
            WorkerMessage::from_json(r#"{"type":"SKIP_WAITING"}"#).unwrap(),
            WorkerMessage::SkipWaiting
        );
        assert_eq!(
            WorkerMessage::from_json(r#"{"type":"CACHE_AUDIO","urls":["a.mp3"]}"#).unwrap(),
            WorkerMessage::CacheAudio {
                urls: vec!["a.mp3".to_string()]
            }
        );
        assert!(WorkerMessage::from_json(r#"{"type":"REBOOT"}"#).is_err());
    }
}
