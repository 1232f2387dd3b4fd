//! Display fields derived from the playback state

use crate::types::PlaybackState;
use audiotour_core::{Tour, Track};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Track panel contents
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackDisplay {
    pub tour_name: String,
    pub icon: String,
    pub title: String,
    pub description: String,
    /// "N / total"
    pub counter: String,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    /// Track navigation is only shown for tours with more than one track
    pub navigation_visible: bool,
}

impl TrackDisplay {
    pub fn for_track(tour: &Tour, track: &Track) -> Self {
        let count = tour.track_count();
        Self {
            tour_name: tour.name.clone(),
            icon: tour.icon.clone(),
            title: track.title.clone(),
            description: track.description.clone(),
            counter: format!("{} / {}", track.id, count),
            previous_enabled: !tour.is_first(track.id),
            next_enabled: !tour.is_last(track.id),
            navigation_visible: count > 1,
        }
    }
}

/// Progress bar and time labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressDisplay {
    pub percent: f64,
    pub position_ms: u64,
    pub duration_ms: Option<u64>,
    pub current_label: String,
    pub duration_label: String,
}

impl ProgressDisplay {
    pub fn from_state(state: &PlaybackState) -> Self {
        Self {
            percent: state.percent(),
            position_ms: duration_ms(state.position),
            duration_ms: state.duration.map(duration_ms),
            current_label: format_time(Some(state.position)),
            duration_label: format_time(state.duration),
        }
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::from_state(&PlaybackState::default())
    }
}

/// Play/pause button label
pub fn play_button_label(is_playing: bool) -> &'static str {
    if is_playing {
        "Pauze"
    } else {
        "Afspelen"
    }
}

/// Format a time as `m:ss`; unknown or zero renders as `0:00`
pub fn format_time(time: Option<Duration>) -> String {
    let Some(time) = time else {
        return "0:00".to_string();
    };
    let total = time.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
