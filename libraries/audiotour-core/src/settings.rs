/// Audiotour configuration
use crate::error::{Result, TourError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable prefix (`AUDIOTOUR_PLAYER__SEEK_STEP_SECS=5`)
pub const ENV_PREFIX: &str = "AUDIOTOUR";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub player: PlayerSettings,

    #[serde(default)]
    pub scanner: ScannerSettings,

    #[serde(default)]
    pub pages: PageSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    /// TOML catalog to use instead of the built-in tours
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerSettings {
    /// Delay between loading a track and requesting autoplay
    #[serde(default = "default_autoplay_grace_ms")]
    pub autoplay_grace_ms: u64,

    /// Delay between a track ending and loading the next one
    #[serde(default = "default_auto_advance_delay_ms")]
    pub auto_advance_delay_ms: u64,

    /// Keyboard seek step
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: u64,

    /// Ask the cache to fetch a tour's audio as soon as the tour is loaded
    #[serde(default = "default_true")]
    pub precache_on_tour_load: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScannerSettings {
    /// Pause before listening again after an invalid code
    #[serde(default)]
    pub rescan_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PageSettings {
    /// Page that hosts the player
    #[serde(default = "default_tour_page")]
    pub tour_page: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CacheSettings {
    /// Shared prefix of every cache generation owned by the app
    #[serde(default = "default_cache_prefix")]
    pub prefix: String,

    /// Current static asset generation
    #[serde(default = "default_static_cache")]
    pub static_cache: String,

    /// Current audio generation
    #[serde(default = "default_audio_cache")]
    pub audio_cache: String,

    /// Path fragment that routes a request to the audio cache
    #[serde(default = "default_audio_path_marker")]
    pub audio_path_marker: String,

    /// Static assets fetched on install, relative to the site origin
    #[serde(default = "default_static_assets")]
    pub static_assets: Vec<String>,
}

impl PlayerSettings {
    pub fn autoplay_grace(&self) -> Duration {
        Duration::from_millis(self.autoplay_grace_ms)
    }

    pub fn auto_advance_delay(&self) -> Duration {
        Duration::from_millis(self.auto_advance_delay_ms)
    }

    pub fn seek_step(&self) -> Duration {
        Duration::from_secs(self.seek_step_secs)
    }
}

impl ScannerSettings {
    pub fn rescan_delay(&self) -> Duration {
        Duration::from_millis(self.rescan_delay_ms)
    }
}

impl Settings {
    /// Load configuration from an optional file and the environment
    ///
    /// The file, when given, must exist. `AUDIOTOUR_`-prefixed environment
    /// variables override it, with `__` separating nested keys.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading settings file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.player.seek_step_secs == 0 {
            return Err(TourError::config("player.seek_step_secs must be positive"));
        }

        if self.pages.tour_page.trim().is_empty() {
            return Err(TourError::config("pages.tour_page is required"));
        }

        let cache = &self.cache;
        if cache.prefix.is_empty() {
            return Err(TourError::config("cache.prefix is required"));
        }
        for name in [&cache.static_cache, &cache.audio_cache] {
            if !name.starts_with(&cache.prefix) {
                return Err(TourError::config(format!(
                    "cache name {:?} must start with prefix {:?}",
                    name, cache.prefix
                )));
            }
        }
        if cache.static_cache == cache.audio_cache {
            return Err(TourError::config(
                "cache.static_cache and cache.audio_cache must differ",
            ));
        }
        if cache.audio_path_marker.is_empty() {
            return Err(TourError::config("cache.audio_path_marker is required"));
        }

        Ok(())
    }
}

// Default values
fn default_autoplay_grace_ms() -> u64 {
    100
}

fn default_auto_advance_delay_ms() -> u64 {
    1500
}

fn default_seek_step_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_tour_page() -> String {
    "tour.html".to_string()
}

fn default_cache_prefix() -> String {
    "audiotour-".to_string()
}

fn default_static_cache() -> String {
    "audiotour-v1".to_string()
}

fn default_audio_cache() -> String {
    "audiotour-audio-v1".to_string()
}

fn default_audio_path_marker() -> String {
    "/assets/audio/".to_string()
}

fn default_static_assets() -> Vec<String> {
    [
        "./",
        "./index.html",
        "./tour.html",
        "./css/style.css",
        "./js/app.js",
        "./js/player.js",
        "./js/qr.js",
        "./manifest.json",
    ]
    .iter()
    .map(|asset| (*asset).to_string())
    .collect()
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            autoplay_grace_ms: default_autoplay_grace_ms(),
            auto_advance_delay_ms: default_auto_advance_delay_ms(),
            seek_step_secs: default_seek_step_secs(),
            precache_on_tour_load: default_true(),
        }
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            tour_page: default_tour_page(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            prefix: default_cache_prefix(),
            static_cache: default_static_cache(),
            audio_cache: default_audio_cache(),
            audio_path_marker: default_audio_path_marker(),
            static_assets: default_static_assets(),
        }
    }
}
