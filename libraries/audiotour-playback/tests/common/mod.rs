//! Shared helpers for tour player integration tests

#![allow(dead_code)]

use audiotour_core::{AudioRef, PageLocation, PlayerSettings, TourCatalog};
use audiotour_playback::{
    AudioDevice, DeviceEvent, DeviceEventKind, LoadToken, PlayRequestId, PlayerEvent, TimerId,
    TourPlayer,
};
use std::sync::Arc;
use std::time::Duration;

pub const TOUR_PAGE: &str = "https://venue.example/tour.html";

/// Command received by the mock device
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Load { source: String, token: LoadToken },
    Play { token: LoadToken, request: PlayRequestId },
    Pause,
    Seek(Duration),
}

/// Audio device that records every command
#[derive(Debug, Default)]
pub struct MockDevice {
    pub calls: Vec<DeviceCall>,
    pub position: Duration,
}

impl MockDevice {
    /// Most recent play request, if any
    pub fn last_play(&self) -> Option<(LoadToken, PlayRequestId)> {
        self.calls.iter().rev().find_map(|call| match call {
            DeviceCall::Play { token, request } => Some((*token, *request)),
            _ => None,
        })
    }

    pub fn last_source(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            DeviceCall::Load { source, .. } => Some(source.as_str()),
            _ => None,
        })
    }

    pub fn count_loads(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::Load { .. }))
            .count()
    }
}

impl AudioDevice for MockDevice {
    fn load(&mut self, source: &AudioRef, token: LoadToken) {
        self.position = Duration::ZERO;
        self.calls.push(DeviceCall::Load {
            source: source.to_string(),
            token,
        });
    }

    fn play(&mut self, token: LoadToken, request: PlayRequestId) {
        self.calls.push(DeviceCall::Play { token, request });
    }

    fn pause(&mut self) {
        self.calls.push(DeviceCall::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.position = position;
        self.calls.push(DeviceCall::Seek(position));
    }

    fn position(&self) -> Duration {
        self.position
    }
}

pub type TestPlayer = TourPlayer<MockDevice>;

pub fn player_at(url: &str) -> TestPlayer {
    TourPlayer::new(
        Arc::new(TourCatalog::builtin()),
        PlayerSettings::default(),
        MockDevice::default(),
        PageLocation::parse(url).unwrap(),
    )
}

pub fn player() -> TestPlayer {
    player_at(TOUR_PAGE)
}

/// Send a device event for the current load
pub fn device_event(player: &mut TestPlayer, kind: DeviceEventKind) {
    let token = player.load_token();
    let _ = player.handle_device_event(DeviceEvent::new(token, kind));
}

/// Answer the outstanding play request with success
pub fn confirm_play(player: &mut TestPlayer) {
    let (token, request) = player.device().last_play().expect("no play request");
    player
        .handle_device_event(DeviceEvent::new(
            token,
            DeviceEventKind::PlayStarted { request },
        ))
        .unwrap();
}

pub fn set_duration(player: &mut TestPlayer, secs: u64) {
    device_event(
        player,
        DeviceEventKind::MetadataLoaded {
            duration: Duration::from_secs(secs),
        },
    );
}

/// Ids of timers scheduled in `events`
pub fn scheduled_timers(events: &[PlayerEvent]) -> Vec<(TimerId, u64)> {
    events
        .iter()
        .filter_map(|event| match event {
            PlayerEvent::TimerScheduled { id, delay_ms } => Some((*id, *delay_ms)),
            _ => None,
        })
        .collect()
}

/// Fire every timer scheduled since the last drain
pub fn fire_timers(player: &mut TestPlayer) {
    let events = player.drain_events();
    for (id, _) in scheduled_timers(&events) {
        let _ = player.handle_timer(id);
    }
}

/// Load and start playback, answering the device
pub fn start_playing(player: &mut TestPlayer, tour: &str, track: u32) {
    player.load_tour(tour, track, true).unwrap();
    fire_timers(player);
    confirm_play(player);
    player.drain_events();
}
