//! Tour and track types

use super::TourId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque locator of a track's audio resource (relative path or URL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioRef(String);

impl AudioRef {
    /// Create a new audio reference
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Get the locator string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AudioRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One narrated audio segment within a tour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// 1-based track number, equal to the track's position in its tour
    pub id: u32,

    /// Track title
    pub title: String,

    /// Short description shown under the title
    pub description: String,

    /// Audio resource
    pub audio: AudioRef,
}

impl Track {
    /// Create a new track
    pub fn new(
        id: u32,
        title: impl Into<String>,
        description: impl Into<String>,
        audio: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            audio: AudioRef::new(audio),
        }
    }
}

/// A named, ordered set of tracks representing one guided route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    /// Tour identifier (case-insensitive)
    pub id: TourId,

    /// Display name
    pub name: String,

    /// Icon shown next to the track title
    pub icon: String,

    /// Tracks in playback order
    pub tracks: Vec<Track>,
}

impl Tour {
    /// Number of tracks in the tour
    pub fn track_count(&self) -> u32 {
        u32::try_from(self.tracks.len()).unwrap_or(u32::MAX)
    }

    /// Look up a track by its 1-based number
    pub fn track(&self, number: u32) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == number)
    }

    /// Clamp a requested track number into `[1, track_count]`
    pub fn clamp_track(&self, requested: u32) -> u32 {
        requested.clamp(1, self.track_count().max(1))
    }

    /// Whether `number` is the first track
    pub fn is_first(&self, number: u32) -> bool {
        number <= 1
    }

    /// Whether `number` is the last track
    pub fn is_last(&self, number: u32) -> bool {
        number >= self.track_count()
    }

    /// Audio references of every track, in order
    pub fn audio_refs(&self) -> impl Iterator<Item = &AudioRef> {
        self.tracks.iter().map(|track| &track.audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_track_tour() -> Tour {
        Tour {
            id: TourId::new("t"),
            name: "Test".to_string(),
            icon: "*".to_string(),
            tracks: (1..=3)
                .map(|n| Track::new(n, format!("Track {}", n), "", format!("t{}.mp3", n)))
                .collect(),
        }
    }

    #[test]
    fn clamp_track_bounds() {
        let tour = three_track_tour();
        assert_eq!(tour.clamp_track(0), 1);
        assert_eq!(tour.clamp_track(2), 2);
        assert_eq!(tour.clamp_track(99), 3);
    }

    #[test]
    fn first_and_last() {
        let tour = three_track_tour();
        assert!(tour.is_first(1));
        assert!(!tour.is_first(2));
        assert!(tour.is_last(3));
        assert!(!tour.is_last(2));
    }

    #[test]
    fn track_lookup() {
        let tour = three_track_tour();
        assert_eq!(tour.track(2).map(|t| t.title.as_str()), Some("Track 2"));
        assert!(tour.track(4).is_none());
    }
}
