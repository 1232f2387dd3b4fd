//! Status line shown to the visitor

use crate::device::DeviceErrorKind;
use serde::{Deserialize, Serialize};

/// Visual weight of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    TourNotFound,
    TrackNotFound,
    /// Autoplay was blocked; the visitor has to press play
    TapToPlay,
    /// Device is buffering
    Buffering,
    LoadingNextTrack,
    TourComplete,
    Device(DeviceErrorKind),
    InvalidScanCode,
}

impl Status {
    pub fn kind(self) -> StatusKind {
        match self {
            Status::TapToPlay | Status::Buffering | Status::LoadingNextTrack => StatusKind::Info,
            Status::TourComplete => StatusKind::Success,
            Status::TourNotFound
            | Status::TrackNotFound
            | Status::Device(_)
            | Status::InvalidScanCode => StatusKind::Error,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Status::TourNotFound => "Tour niet gevonden",
            Status::TrackNotFound => "Track niet gevonden",
            Status::TapToPlay => "Tik op Afspelen om te starten",
            Status::Buffering => "Laden...",
            Status::LoadingNextTrack => "Volgende track wordt geladen...",
            Status::TourComplete => "Tour voltooid! \u{1f389}",
            Status::Device(kind) => kind.message(),
            Status::InvalidScanCode => {
                "Deze QR-code hoort niet bij de audiotour. Probeer een andere QR-code."
            }
        }
    }
}
