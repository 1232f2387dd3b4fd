//! Player Events
//!
//! Event-based communication with the UI layer. The player queues events as
//! it transitions; the host drains them after every call and applies them:
//! - State and track changes (button labels, track panel)
//! - Progress updates (slider, time labels)
//! - Status line changes
//! - Location rewrites (`history.replaceState`)
//! - Timer requests (`setTimeout` then `TourPlayer::handle_timer`)

use crate::display::{ProgressDisplay, TrackDisplay};
use crate::status::Status;
use crate::types::{LoadToken, PlayerPhase, TimerId};
use audiotour_core::TourId;
use serde::{Deserialize, Serialize};

/// Events emitted by the tour player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Phase or playing flag changed
    StateChanged {
        phase: PlayerPhase,
        is_playing: bool,
    },

    /// A track was loaded
    TrackChanged {
        tour: TourId,
        track: u32,
        token: LoadToken,
    },

    /// Track panel contents changed
    DisplayChanged(TrackDisplay),

    /// Progress bar and time labels changed
    ProgressChanged(ProgressDisplay),

    /// Status line changed (`None` hides it)
    StatusChanged { status: Option<Status> },

    /// Page location was rewritten without a new history entry
    LocationReplaced { url: String },

    /// Host should call `handle_timer(id)` after `delay_ms`
    TimerScheduled { id: TimerId, delay_ms: u64 },

    /// A previously scheduled timer no longer matters
    TimerCancelled { id: TimerId },

    /// Audio of a newly loaded tour, for the offline cache
    PrecacheRequested { urls: Vec<String> },

    /// Last track of the tour finished
    TourCompleted { tour: TourId },
}
