//! Audiotour - Tour Playback
//!
//! Platform-agnostic playback controller for narrated audio tours.
//!
//! This crate provides:
//! - Tour and track loading with deep-link support
//! - Play / pause / stop / replay / seek
//! - Track navigation that keeps the play intent
//! - Auto-advance at the end of a track, tour completion at the last one
//! - Keyboard shortcuts
//! - Scan-code interpretation for QR jumps between tour stops
//!
//! # Architecture
//!
//! The controller never touches a clock or the audio output directly:
//! - Audio output is an [`AudioDevice`] implemented per platform
//! - Device callbacks come back as [`DeviceEvent`]s tagged with a load token
//! - Delays are announced as [`PlayerEvent::TimerScheduled`] and fired by the host
//! - UI updates are queued as [`PlayerEvent`]s and drained after each call
//!
//! # Example
//!
//! ```rust
//! use audiotour_core::{AudioRef, PageLocation, PlayerSettings, TourCatalog};
//! use audiotour_playback::{
//!     AudioDevice, DeviceEvent, DeviceEventKind, LoadToken, PlayRequestId, TourPlayer,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[derive(Default)]
//! struct Silent;
//!
//! impl AudioDevice for Silent {
//!     fn load(&mut self, _source: &AudioRef, _token: LoadToken) {}
//!     fn play(&mut self, _token: LoadToken, _request: PlayRequestId) {}
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _position: Duration) {}
//!     fn position(&self) -> Duration {
//!         Duration::ZERO
//!     }
//! }
//!
//! let location = PageLocation::parse("https://venue.example/tour.html?tour=b&track=3").unwrap();
//! let mut player = TourPlayer::new(
//!     Arc::new(TourCatalog::builtin()),
//!     PlayerSettings::default(),
//!     Silent,
//!     location,
//! );
//!
//! player.init().unwrap();
//! assert_eq!(player.active_track(), Some(3));
//!
//! let token = player.load_token();
//! player
//!     .handle_device_event(DeviceEvent::new(
//!         token,
//!         DeviceEventKind::MetadataLoaded { duration: Duration::from_secs(90) },
//!     ))
//!     .unwrap();
//! assert_eq!(player.progress().duration_label, "1:30");
//! ```

pub mod device;
pub mod display;
mod error;
pub mod events;
pub mod keyboard;
mod player;
pub mod scanner;
pub mod status;
mod timers;
pub mod types;
pub mod wasm;

pub use device::{AudioDevice, DeviceErrorKind, DeviceEvent, DeviceEventKind};
pub use display::{ProgressDisplay, TrackDisplay};
pub use error::{PlayerError, Result};
pub use events::PlayerEvent;
pub use keyboard::{Key, KeyCommand, KeyTarget};
pub use player::TourPlayer;
pub use scanner::{interpret_scan, ScanDecision, ScanSession, ScanState, ScanTarget, ScannerStartError};
pub use status::{Status, StatusKind};
pub use timers::TimerAction;
pub use types::{LoadToken, PlayRequestId, PlaybackState, PlayerPhase, TimerId};
