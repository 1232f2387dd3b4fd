//! Offline cache worker
//!
//! Mirrors the lifecycle of a browser service worker:
//!
//! 1. `install`: precache the static manifest (all or nothing) and the tour
//!    audio (best effort), concurrently
//! 2. `activate`: purge old cache generations
//! 3. `handle_fetch`: serve audio cache-first and everything else
//!    stale-while-revalidate
//! 4. `handle_message`: page commands (skip waiting, cache extra audio)

use crate::error::{CacheError, Result};
use crate::fetcher::Fetcher;
use crate::manifest::CacheManifest;
use crate::storage::CacheStorage;
use crate::types::{
    CacheRequest, CacheResponse, InstallReport, Method, PrecacheReport, ResponseSource,
    WorkerMessage, WorkerState,
};
use audiotour_core::CacheSettings;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};
use url::Url;

/// Response chosen by the worker
#[derive(Debug)]
pub struct Served {
    pub response: CacheResponse,
    pub source: ResponseSource,

    /// Background refresh of a stale cached copy
    pub revalidation: Option<JoinHandle<()>>,
}

/// What the worker does with an intercepted request
#[derive(Debug)]
pub enum FetchOutcome {
    /// Not handled; the request goes to the network untouched
    Bypass,
    Served(Served),
}

impl FetchOutcome {
    pub fn served(self) -> Option<Served> {
        match self {
            FetchOutcome::Served(served) => Some(served),
            FetchOutcome::Bypass => None,
        }
    }
}

/// Result of a page message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    SkippedWaiting,
    AudioCached(PrecacheReport),
}

struct Inner<F> {
    fetcher: F,
    storage: CacheStorage,
    settings: CacheSettings,
    scope: Url,
    state: RwLock<WorkerState>,
    skip_waiting: RwLock<bool>,
}

/// Offline cache worker for one scope
pub struct OfflineCache<F: Fetcher + 'static> {
    inner: Arc<Inner<F>>,
}

impl<F: Fetcher + 'static> Clone for OfflineCache<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: Fetcher + 'static> OfflineCache<F> {
    /// Create a worker controlling `scope` (the site root, ending in `/`)
    pub fn new(fetcher: F, storage: CacheStorage, settings: CacheSettings, scope: Url) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                storage,
                settings,
                scope,
                state: RwLock::new(WorkerState::Parsed),
                skip_waiting: RwLock::new(false),
            }),
        }
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.inner.storage
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.inner.settings
    }

    pub fn scope(&self) -> &Url {
        &self.inner.scope
    }

    pub async fn state(&self) -> WorkerState {
        *self.inner.state.read().await
    }

    /// Whether activation was requested without waiting for old pages to close
    pub async fn is_skip_waiting(&self) -> bool {
        *self.inner.skip_waiting.read().await
    }

    // ===== Lifecycle =====

    /// Precache the manifest
    ///
    /// Static assets are all-or-nothing: any failure fails the install and
    /// nothing is stored. Audio is best effort.
    pub async fn install(&self, manifest: &CacheManifest) -> Result<InstallReport> {
        info!(
            static_assets = manifest.static_assets.len(),
            audio = manifest.audio.len(),
            "Installing offline cache"
        );
        self.set_state(WorkerState::Installing).await;

        let (static_result, audio) = tokio::join!(
            self.precache_static(&manifest.static_assets),
            self.precache_audio(manifest.audio.clone()),
        );

        let static_cached = match static_result {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, "Install failed");
                self.set_state(WorkerState::Redundant).await;
                return Err(err);
            }
        };

        if !audio.failed.is_empty() {
            warn!(failed = audio.failed.len(), "Some audio files not cached");
        }

        self.set_state(WorkerState::Installed).await;
        self.skip_waiting().await;
        info!(static_cached, audio_cached = audio.cached.len(), "Installation complete");

        Ok(InstallReport {
            static_cached,
            audio,
        })
    }

    /// Delete every app cache that is not a current generation
    ///
    /// Returns the deleted cache names.
    pub async fn activate(&self) -> Result<Vec<String>> {
        info!("Activating offline cache");
        let settings = &self.inner.settings;
        let mut deleted = Vec::new();

        for name in self.inner.storage.keys().await {
            let stale = name.starts_with(&settings.prefix)
                && name != settings.static_cache
                && name != settings.audio_cache;
            if stale && self.inner.storage.delete(&name).await {
                info!(cache = %name, "Deleted old cache");
                deleted.push(name);
            }
        }

        self.set_state(WorkerState::Activated).await;
        info!(deleted = deleted.len(), "Activation complete");
        Ok(deleted)
    }

    /// Install then activate
    pub async fn start(&self, manifest: &CacheManifest) -> Result<InstallReport> {
        let report = self.install(manifest).await?;
        self.activate().await?;
        Ok(report)
    }

    /// Request activation without waiting
    pub async fn skip_waiting(&self) {
        *self.inner.skip_waiting.write().await = true;
    }

    // ===== Fetch routing =====

    /// Route an intercepted request
    pub async fn handle_fetch(&self, request: &CacheRequest) -> Result<FetchOutcome> {
        if request.method != Method::GET {
            return Ok(FetchOutcome::Bypass);
        }
        if request.url.origin() != self.inner.scope.origin() {
            debug!(url = %request.url, "Bypassing foreign request");
            return Ok(FetchOutcome::Bypass);
        }

        let served = if request
            .url
            .path()
            .contains(&self.inner.settings.audio_path_marker)
        {
            self.cache_first(&request.url).await?
        } else {
            self.stale_while_revalidate(&request.url).await?
        };
        Ok(FetchOutcome::Served(served))
    }

    async fn cache_first(&self, url: &Url) -> Result<Served> {
        let cache = &self.inner.settings.audio_cache;

        if let Some(response) = self.inner.storage.match_in(cache, url).await {
            debug!(path = url.path(), "Audio from cache");
            return Ok(Served {
                response,
                source: ResponseSource::Cache,
                revalidation: None,
            });
        }

        let response = self.inner.fetcher.fetch(url).await?;
        if response.is_ok() {
            self.inner.storage.put(cache, url, response.clone()).await;
            debug!(path = url.path(), "Audio cached");
        }
        Ok(Served {
            response,
            source: ResponseSource::Network,
            revalidation: None,
        })
    }

    async fn stale_while_revalidate(&self, url: &Url) -> Result<Served> {
        if let Some(response) = self.inner.storage.match_any(url).await {
            let inner = Arc::clone(&self.inner);
            let target = url.clone();
            let revalidation = tokio::spawn(async move {
                inner.refresh_static(&target).await;
            });
            return Ok(Served {
                response,
                source: ResponseSource::Cache,
                revalidation: Some(revalidation),
            });
        }

        let response = self.inner.fetcher.fetch(url).await?;
        if response.is_ok() {
            self.inner
                .storage
                .put(&self.inner.settings.static_cache, url, response.clone())
                .await;
        }
        Ok(Served {
            response,
            source: ResponseSource::Network,
            revalidation: None,
        })
    }

    // ===== Messages =====

    /// Handle a message posted by the page
    pub async fn handle_message(&self, message: WorkerMessage) -> Result<MessageOutcome> {
        match message {
            WorkerMessage::SkipWaiting => {
                self.skip_waiting().await;
                Ok(MessageOutcome::SkippedWaiting)
            }
            WorkerMessage::CacheAudio { urls } => {
                let mut resolved = Vec::with_capacity(urls.len());
                let mut unresolved = Vec::new();
                for url in urls {
                    match self.inner.scope.join(&url) {
                        Ok(url) => resolved.push(url),
                        Err(err) => {
                            warn!(url = %url, error = %err, "Failed to cache");
                            unresolved.push(url);
                        }
                    }
                }

                let mut report = self.precache_audio(resolved).await;
                report.failed.extend(unresolved);
                report.failed.sort();
                Ok(MessageOutcome::AudioCached(report))
            }
        }
    }

    // ===== Precache =====

    async fn precache_static(&self, urls: &[Url]) -> Result<usize> {
        let mut tasks = JoinSet::new();
        for url in urls.iter().cloned() {
            let inner = Arc::clone(&self.inner);
            tasks.spawn(async move {
                let result = inner.fetch_ok(&url).await;
                (url, result)
            });
        }

        let mut fetched = Vec::with_capacity(urls.len());
        while let Some(joined) = tasks.join_next().await {
            let (url, result) = joined.map_err(|e| CacheError::Precache(e.to_string()))?;
            match result {
                Ok(response) => fetched.push((url, response)),
                Err(err) => {
                    tasks.abort_all();
                    return Err(CacheError::Precache(format!("{url}: {err}")));
                }
            }
        }

        let cache = &self.inner.settings.static_cache;
        self.inner.storage.open(cache).await;
        for (url, response) in &fetched {
            self.inner.storage.put(cache, url, response.clone()).await;
        }
        Ok(fetched.len())
    }

    async fn precache_audio(&self, urls: Vec<Url>) -> PrecacheReport {
        let cache = self.inner.settings.audio_cache.clone();
        self.inner.storage.open(&cache).await;

        let mut tasks = JoinSet::new();
        for url in urls {
            let inner = Arc::clone(&self.inner);
            let cache = cache.clone();
            tasks.spawn(async move {
                match inner.fetch_ok(&url).await {
                    Ok(response) => {
                        inner.storage.put(&cache, &url, response).await;
                        Ok(url)
                    }
                    Err(err) => {
                        warn!(url = %url, error = %err, "Failed to cache");
                        Err(url)
                    }
                }
            });
        }

        let mut report = PrecacheReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(url)) => report.cached.push(url.to_string()),
                Ok(Err(url)) => report.failed.push(url.to_string()),
                Err(err) => warn!(error = %err, "Precache task failed"),
            }
        }
        report.cached.sort();
        report.failed.sort();
        report
    }

    async fn set_state(&self, state: WorkerState) {
        debug!(?state, "Worker state");
        *self.inner.state.write().await = state;
    }
}

impl<F: Fetcher> Inner<F> {
    /// Fetch and require a 2xx status
    async fn fetch_ok(&self, url: &Url) -> Result<CacheResponse> {
        let response = self.fetcher.fetch(url).await?;
        if response.is_ok() {
            Ok(response)
        } else {
            Err(CacheError::Http {
                status: response.status,
                url: url.to_string(),
            })
        }
    }

    async fn refresh_static(&self, url: &Url) {
        match self.fetcher.fetch(url).await {
            Ok(response) if response.is_ok() => {
                self.storage
                    .put(&self.settings.static_cache, url, response)
                    .await;
                debug!(url = %url, "Revalidated");
            }
            Ok(response) => debug!(url = %url, status = response.status, "Revalidation skipped"),
            Err(err) => debug!(url = %url, error = %err, "Revalidation failed, keeping cached copy"),
        }
    }
}
