//! Tour catalog
//!
//! The catalog is an immutable table of tours, built once at start-up either
//! from the venue's built-in data or from a TOML file. Lookups are
//! case-insensitive because ids are normalized by [`TourId`].

use crate::error::{Result, TourError};
use crate::settings::Settings;
use crate::types::{AudioRef, Tour, TourId, Track};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Immutable mapping from tour id to tour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourCatalog {
    tours: BTreeMap<TourId, Tour>,
}

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
struct CatalogFile {
    tours: Vec<Tour>,
}

impl TourCatalog {
    /// Build a catalog, validating every tour
    ///
    /// # Errors
    /// Returns `InvalidCatalog` if there are no tours, a tour id is empty or
    /// duplicated, a tour has no tracks, or a track id does not match its
    /// 1-based position.
    pub fn new(tours: Vec<Tour>) -> Result<Self> {
        if tours.is_empty() {
            return Err(TourError::invalid_catalog("catalog has no tours"));
        }

        let mut map = BTreeMap::new();
        for tour in tours {
            validate_tour(&tour)?;
            let id = tour.id.clone();
            if map.insert(id.clone(), tour).is_some() {
                return Err(TourError::invalid_catalog(format!(
                    "duplicate tour id {}",
                    id
                )));
            }
        }

        Ok(Self { tours: map })
    }

    /// Parse a catalog from TOML
    pub fn from_toml(raw: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::new(file.tours)
    }

    /// Load a catalog from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml(&raw)?;
        info!(path = %path.display(), tours = catalog.len(), "Loaded tour catalog");
        Ok(catalog)
    }

    /// Catalog configured by `settings`: the file at `catalog_path`, or the built-in tours
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        match settings.catalog_path.as_deref() {
            Some(path) => Self::load(path),
            None => {
                debug!("Using built-in tour catalog");
                Ok(Self::builtin())
            }
        }
    }

    /// Look up a tour by id, ignoring case
    pub fn get(&self, id: &str) -> Option<&Tour> {
        self.tours.get(&TourId::new(id))
    }

    /// Look up a tour by normalized id
    pub fn get_by_id(&self, id: &TourId) -> Option<&Tour> {
        self.tours.get(id)
    }

    /// Look up a tour, failing with `TourNotFound`
    pub fn require(&self, id: &str) -> Result<&Tour> {
        self.get(id)
            .ok_or_else(|| TourError::TourNotFound(id.to_string()))
    }

    /// Whether the catalog has a tour with this id
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All tours, ordered by id
    pub fn tours(&self) -> impl Iterator<Item = &Tour> {
        self.tours.values()
    }

    /// Number of tours
    pub fn len(&self) -> usize {
        self.tours.len()
    }

    /// Whether the catalog is empty (never true for a validated catalog)
    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    /// Every audio reference in the catalog, tour by tour
    pub fn audio_refs(&self) -> Vec<AudioRef> {
        self.tours().flat_map(Tour::audio_refs).cloned().collect()
    }

    /// The venue's two tours
    pub fn builtin() -> Self {
        let tours = vec![scouting_tour(), roaring_twenties_tour()];
        // Built-in data satisfies every invariant checked by `new`
        let tours = tours
            .into_iter()
            .map(|tour| (tour.id.clone(), tour))
            .collect();
        Self { tours }
    }
}

fn validate_tour(tour: &Tour) -> Result<()> {
    if tour.id.is_empty() {
        return Err(TourError::invalid_catalog("tour id is empty"));
    }
    if tour.tracks.is_empty() {
        return Err(TourError::invalid_catalog(format!(
            "tour {} has no tracks",
            tour.id
        )));
    }
    for (index, track) in tour.tracks.iter().enumerate() {
        let expected = u32::try_from(index + 1).unwrap_or(u32::MAX);
        if track.id != expected {
            return Err(TourError::invalid_catalog(format!(
                "tour {} track at position {} has id {}",
                tour.id, expected, track.id
            )));
        }
    }
    Ok(())
}

fn scouting_tour() -> Tour {
    let tracks = [
        ("Naam", "Introductie van de audiotour en de betekenis van Scouting Impeesa in Amersfoort."),
        ("Troephuizen", "Een kijkje in de troephuizen: het hart van de groep en de plek waar scouts samenkomen."),
        ("Das", "Het verhaal achter de das en waarom deze zo belangrijk is binnen Scouting Impeesa."),
        ("Keukens bouwen", "Hoe scouts samen keukens bouwen en wat dit betekent voor samenwerking en traditie."),
        ("Yakar draaien", "De traditie van het Yakar draaien en andere bijzondere gebruiken binnen de groep."),
        ("Corona", "De impact van corona op Scouting Impeesa en hoe de groep hiermee omging."),
    ];

    Tour {
        id: TourId::new("A"),
        name: "Scouting Impeesa".to_string(),
        icon: "\u{269c}\u{fe0f}".to_string(),
        tracks: build_tracks("tourA", &tracks),
    }
}

fn roaring_twenties_tour() -> Tour {
    let tracks = [
        ("Auto", "De opkomst van de auto in de jaren 20 van de 19e eeuw en de impact op mobiliteit en samenleving."),
        ("Vliegen", "De eerste stappen in de luchtvaart en hoe vliegen het wereldbeeld veranderde in de jaren 20."),
        ("Geluidsfilm en radio", "De introductie van geluidsfilm en radio als nieuwe media in de jaren 20."),
        ("Radio Kootwijk", "Het verhaal van Radio Kootwijk als technisch hoogstandje en communicatiecentrum in de jaren 20."),
        ("Tuschinski", "De bouw van Theater Tuschinski en de culturele bloei in de jaren 20."),
        ("Cultuur en armoede", "De tegenstelling tussen culturele bloei en armoede in de samenleving van de jaren 20."),
        ("Beurskrach", "De gevolgen van de beurskrach van 1929 voor Nederland en de wereld."),
        ("Einde tour", "Afsluiting van de audiotour en een terugblik op de hoogtepunten van de jaren 20 van de 19e eeuw."),
    ];

    Tour {
        id: TourId::new("B"),
        name: "Roaring Twenties".to_string(),
        icon: "\u{1f3b7}".to_string(),
        tracks: build_tracks("tourB", &tracks),
    }
}

fn build_tracks(folder: &str, entries: &[(&str, &str)]) -> Vec<Track> {
    entries
        .iter()
        .zip(1u32..)
        .map(|((title, description), id)| {
            Track::new(
                id,
                *title,
                *description,
                format!("assets/audio/{}/track{:02}.mp3", folder, id),
            )
        })
        .collect()
}
