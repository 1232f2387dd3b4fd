//! Audiotour - Offline Cache
//!
//! Keeps the site and the tour audio available without a network.
//!
//! - Two cache generations: static assets and audio
//! - Static manifest precached all-or-nothing on install, audio best effort
//! - Old generations purged on activation
//! - Audio served cache-first, everything else stale-while-revalidate
//! - Extra audio precached on request from the page
//!
//! # Example
//!
//! ```rust,no_run
//! use audiotour_cache::{CacheManifest, CacheRequest, CacheStorage, HttpFetcher, OfflineCache};
//! use audiotour_core::{Settings, TourCatalog};
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default();
//! let scope = Url::parse("https://venue.example/")?;
//! let manifest = CacheManifest::build(&scope, &TourCatalog::builtin(), &settings.cache)?;
//!
//! let worker = OfflineCache::new(HttpFetcher::new()?, CacheStorage::new(), settings.cache, scope.clone());
//! worker.start(&manifest).await?;
//!
//! let request = CacheRequest::get(scope.join("assets/audio/tourA/track01.mp3")?);
//! let served = worker.handle_fetch(&request).await?.served();
//! # Ok(())
//! # }
//! ```

mod error;
mod fetcher;
mod manifest;
mod storage;
pub mod types;
mod worker;

pub use error::{CacheError, Result};
pub use fetcher::{Fetcher, HttpFetcher};
pub use manifest::CacheManifest;
pub use storage::CacheStorage;
pub use types::{
    CacheRequest, CacheResponse, InstallReport, Method, PrecacheReport, ResponseSource,
    WorkerMessage, WorkerState,
};
pub use worker::{FetchOutcome, MessageOutcome, OfflineCache, Served};
