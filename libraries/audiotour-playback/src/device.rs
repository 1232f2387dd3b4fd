//! Platform-agnostic audio device
//!
//! Abstracts the audio output element (HTML audio in the browser, a mock in
//! tests). Commands flow from the player into the device; everything the
//! device has to say comes back as a [`DeviceEvent`] fed to
//! `TourPlayer::handle_device_event`.

use crate::types::{LoadToken, PlayRequestId};
use audiotour_core::AudioRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Audio output device
///
/// Implementors must tag every event they report with the token of the load
/// that produced it, and echo the request id of `play` in the matching
/// `PlayStarted` / `PlayRejected` event.
pub trait AudioDevice {
    /// Replace the current source
    ///
    /// Cancels any in-flight playback of the previous source.
    fn load(&mut self, source: &AudioRef, token: LoadToken);

    /// Request playback start
    ///
    /// Completion is asynchronous and reported as `PlayStarted` or
    /// `PlayRejected`.
    fn play(&mut self, token: LoadToken, request: PlayRequestId);

    /// Pause output
    fn pause(&mut self);

    /// Move the playhead
    fn seek(&mut self, position: Duration);

    /// Current playhead position
    fn position(&self) -> Duration;
}

/// Event reported by the audio device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEvent {
    /// Load the event belongs to
    pub token: LoadToken,

    /// What happened
    pub kind: DeviceEventKind,
}

impl DeviceEvent {
    pub fn new(token: LoadToken, kind: DeviceEventKind) -> Self {
        Self { token, kind }
    }
}

/// Kinds of device events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceEventKind {
    /// Duration became known
    MetadataLoaded { duration: Duration },

    /// Playhead moved
    TimeUpdate { position: Duration },

    /// Playback reached the end of the source
    Ended,

    /// Loading or decoding failed
    Error(DeviceErrorKind),

    /// Buffering stalled playback
    Waiting,

    /// Enough data to play
    CanPlay,

    /// A play request succeeded
    PlayStarted { request: PlayRequestId },

    /// A play request was refused (e.g. autoplay policy)
    PlayRejected { request: PlayRequestId, reason: String },
}

/// Device error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceErrorKind {
    /// Fetching was aborted
    Aborted,

    /// Network failure while loading
    Network,

    /// Source could not be decoded
    Decode,

    /// Source missing or unsupported
    NotFound,

    /// Anything the device could not classify
    Unknown,
}

impl DeviceErrorKind {
    /// Map a media error code (1 aborted, 2 network, 3 decode, 4 source not supported)
    pub fn from_media_error_code(code: u16) -> Self {
        match code {
            1 => DeviceErrorKind::Aborted,
            2 => DeviceErrorKind::Network,
            3 => DeviceErrorKind::Decode,
            4 => DeviceErrorKind::NotFound,
            _ => DeviceErrorKind::Unknown,
        }
    }

    /// User-facing message
    pub fn message(self) -> &'static str {
        match self {
            DeviceErrorKind::Aborted => "Audio afspelen geannuleerd.",
            DeviceErrorKind::Network => "Netwerkfout bij laden audio.",
            DeviceErrorKind::Decode => "Audiobestand kon niet worden gedecodeerd.",
            DeviceErrorKind::NotFound => "Audiobestand niet gevonden.",
            DeviceErrorKind::Unknown => "Er ging iets mis bij het laden van de audio.",
        }
    }
}

impl fmt::Display for DeviceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceErrorKind::Aborted => "aborted",
            DeviceErrorKind::Network => "network",
            DeviceErrorKind::Decode => "decode",
            DeviceErrorKind::NotFound => "not found",
            DeviceErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
