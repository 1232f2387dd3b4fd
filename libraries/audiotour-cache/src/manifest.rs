//! Precache manifest

use crate::error::Result;
use audiotour_core::{CacheSettings, TourCatalog};
use url::Url;

/// Resources fetched on install, resolved against the worker scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    pub static_assets: Vec<Url>,
    pub audio: Vec<Url>,
}

impl CacheManifest {
    /// Static assets from the settings plus every audio file in the catalog
    pub fn build(scope: &Url, catalog: &TourCatalog, settings: &CacheSettings) -> Result<Self> {
        let static_assets = settings
            .static_assets
            .iter()
            .map(|asset| scope.join(asset))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let audio = catalog
            .audio_refs()
            .iter()
            .map(|audio| scope.join(audio.as_str()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            static_assets,
            audio,
        })
    }

    pub fn len(&self) -> usize {
        self.static_assets.len() + self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.static_assets.is_empty() && self.audio.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_manifest() {
        let scope = Url::parse("https://venue.example/audiotour/").unwrap();
        let manifest =
            CacheManifest::build(&scope, &TourCatalog::builtin(), &CacheSettings::default())
                .unwrap();

        assert_eq!(manifest.static_assets.len(), 8);
        assert_eq!(manifest.static_assets[0].as_str(), "https://venue.example/audiotour/");
        assert_eq!(
            manifest.static_assets[2].as_str(),
            "https://venue.example/audiotour/tour.html"
        );
        assert_eq!(manifest.audio.len(), 14);
        assert_eq!(
            manifest.audio[0].as_str(),
            "https://venue.example/audiotour/assets/audio/tourA/track01.mp3"
        );
        assert_eq!(manifest.len(), 22);
    }
}
