//! Core types for tour playback

use audiotour_core::TourId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Sequence number of a track load
///
/// Every load supersedes the previous one. Device events and timers carry the
/// token of the load they belong to, so anything tagged with an older token
/// is stale and gets dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadToken(u64);

impl LoadToken {
    /// Wrap a raw token (as echoed back by a platform device)
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw token value
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// Sequence number of a play request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayRequestId(u64);

impl PlayRequestId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Identifier of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(u64);

impl TimerId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerPhase {
    /// No tour loaded
    #[default]
    Idle,

    /// Tour and track set, not playing
    Loaded,

    /// Device confirmed playback
    Playing,

    /// Paused mid-track
    Paused,

    /// Track reached its end
    Ended,

    /// Device reported an error for the current track
    Error,
}

impl fmt::Display for PlayerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerPhase::Idle => "idle",
            PlayerPhase::Loaded => "loaded",
            PlayerPhase::Playing => "playing",
            PlayerPhase::Paused => "paused",
            PlayerPhase::Ended => "ended",
            PlayerPhase::Error => "error",
        };
        f.write_str(name)
    }
}

/// Live playback state, one per page session
///
/// Invariants:
/// - no active tour implies `is_playing == false`
/// - with an active tour, `1 <= active_track <= track_count`
/// - `position <= duration` once the duration is known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub active_tour: Option<TourId>,
    pub active_track: u32,
    pub is_playing: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            active_tour: None,
            active_track: 1,
            is_playing: false,
            position: Duration::ZERO,
            duration: None,
        }
    }
}

impl PlaybackState {
    /// Progress through the current track in percent, 0 while the duration is unknown
    pub fn percent(&self) -> f64 {
        match self.duration {
            Some(duration) if !duration.is_zero() => {
                (self.position.as_secs_f64() / duration.as_secs_f64() * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        }
    }

    /// Whether a tour is loaded
    pub fn has_tour(&self) -> bool {
        self.active_tour.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_advance() {
        let token = LoadToken::default();
        assert_eq!(token.next().get(), 1);
        assert!(token.next() > token);
    }

    #[test]
    fn percent_requires_duration() {
        let mut state = PlaybackState {
            position: Duration::from_secs(30),
            ..PlaybackState::default()
        };
        assert_eq!(state.percent(), 0.0);

        state.duration = Some(Duration::from_secs(120));
        assert_eq!(state.percent(), 25.0);

        state.duration = Some(Duration::ZERO);
        assert_eq!(state.percent(), 0.0);
    }
}
