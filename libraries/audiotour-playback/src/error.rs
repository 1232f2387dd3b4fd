//! Error types for tour playback

use crate::device::DeviceErrorKind;
use audiotour_core::{TourError, TourId};
use thiserror::Error;

/// Playback errors
///
/// Every error is also surfaced to the visitor through a status message; the
/// `Result` lets hosts log or branch on it.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Requested tour is not in the catalog
    #[error("Tour not found: {0}")]
    TourNotFound(String),

    /// Requested track is not in the active tour
    #[error("Track {track} not found in tour {tour}")]
    TrackNotFound { tour: TourId, track: u32 },

    /// Command needs a loaded tour
    #[error("No tour loaded")]
    NoActiveTour,

    /// Device refused to start playback (autoplay policy)
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// Device failed to load or decode the current track
    #[error("Audio device error: {0}")]
    Device(DeviceErrorKind),

    /// Scanned text is neither a tour code nor a tour link
    #[error("Invalid scan code: {0}")]
    InvalidScanCode(String),

    /// Seeking needs a known duration
    #[error("Seek unavailable: duration unknown")]
    SeekUnavailable,

    /// Catalog or navigation error
    #[error(transparent)]
    Core(#[from] TourError),
}

impl PlayerError {
    /// Whether the visitor was already told through a status message
    ///
    /// These conditions are part of normal operation; callbacks from the
    /// device or host timers only need to log them.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            Self::TourNotFound(_)
                | Self::TrackNotFound { .. }
                | Self::PlaybackRejected(_)
                | Self::Device(_)
        )
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_errors_carry_a_status() {
        assert!(PlayerError::PlaybackRejected("NotAllowedError".into()).is_reported());
        assert!(PlayerError::Device(DeviceErrorKind::Network).is_reported());
        assert!(PlayerError::TourNotFound("Z".into()).is_reported());

        assert!(!PlayerError::NoActiveTour.is_reported());
        assert!(!PlayerError::SeekUnavailable.is_reported());
    }
}
