//! Tour player integration tests
//!
//! Drive the controller with synthetic device events and timer firings.

mod common;

use audiotour_playback::{
    DeviceErrorKind, DeviceEvent, DeviceEventKind, Key, KeyTarget, PlayerError, PlayerEvent,
    PlayerPhase, Status,
};
use common::*;
use std::time::Duration;

// ===== Scenario =====

#[test]
fn test_venue_scenario() {
    let mut player = player();

    player.load_tour("a", 3, true).unwrap();
    assert_eq!(player.active_tour().unwrap().as_str(), "A");
    assert_eq!(player.active_track(), Some(3));
    assert!(!player.is_playing(), "playing only once the device confirms");

    fire_timers(&mut player);
    confirm_play(&mut player);
    assert!(player.is_playing());
    assert_eq!(player.phase(), PlayerPhase::Playing);

    player.load_tour("a", 99, false).unwrap();
    assert_eq!(player.active_track(), Some(6));
    assert!(!player.is_playing());

    let before = player.state().clone();
    let err = player.load_tour("c", 1, false).unwrap_err();
    assert!(matches!(err, PlayerError::TourNotFound(ref id) if id == "c"));
    assert_eq!(player.state(), &before);
    assert_eq!(player.status(), Some(Status::TourNotFound));
}

// ===== Loading =====

#[test]
fn test_load_replaces_source_and_location() {
    let mut player = player_at("https://venue.example/tour.html?tour=B&track=1&lang=nl");
    player.init().unwrap();
    player.drain_events();

    player.load_track(4, false).unwrap();
    assert_eq!(
        player.device().last_source(),
        Some("assets/audio/tourB/track04.mp3")
    );
    assert_eq!(
        player.location().as_str(),
        "https://venue.example/tour.html?tour=B&track=4&lang=nl"
    );

    let events = player.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        PlayerEvent::LocationReplaced { url } if url.ends_with("track=4&lang=nl")
    )));
    let display = player.display().unwrap();
    assert_eq!(display.counter, "4 / 8");
    assert_eq!(display.tour_name, "Roaring Twenties");
}

#[test]
fn test_load_resets_progress() {
    let mut player = player();
    player.load_tour("B", 2, false).unwrap();
    set_duration(&mut player, 120);
    device_event(
        &mut player,
        DeviceEventKind::TimeUpdate {
            position: Duration::from_secs(60),
        },
    );
    assert_eq!(player.progress().percent, 50.0);

    player.next_track().unwrap();
    assert_eq!(player.state().position, Duration::ZERO);
    assert_eq!(player.state().duration, None);
    assert_eq!(player.progress().current_label, "0:00");
}

#[test]
fn test_unknown_track_leaves_state_unchanged() {
    let mut player = player();
    player.load_tour("A", 2, false).unwrap();
    let before = player.state().clone();
    let loads = player.device().count_loads();

    let err = player.load_track(7, false).unwrap_err();
    assert!(matches!(err, PlayerError::TrackNotFound { track: 7, .. }));
    assert_eq!(player.state(), &before);
    assert_eq!(player.device().count_loads(), loads);
    assert_eq!(player.status(), Some(Status::TrackNotFound));
}

#[test]
fn test_load_track_without_tour() {
    let mut player = player();
    assert!(matches!(
        player.load_track(1, false),
        Err(PlayerError::NoActiveTour)
    ));
    assert_eq!(player.phase(), PlayerPhase::Idle);
}

#[test]
fn test_precache_requested_once_per_tour() {
    let mut player = player();
    player.load_tour("A", 1, false).unwrap();
    let events = player.drain_events();
    let urls = events
        .iter()
        .find_map(|event| match event {
            PlayerEvent::PrecacheRequested { urls } => Some(urls.clone()),
            _ => None,
        })
        .expect("precache requested");
    assert_eq!(urls.len(), 6);

    player.load_track(2, false).unwrap();
    let events = player.drain_events();
    assert!(!events
        .iter()
        .any(|event| matches!(event, PlayerEvent::PrecacheRequested { .. })));
}

// ===== Playback =====

#[test]
fn test_play_rejected_shows_tap_to_play() {
    let mut player = player();
    player.load_tour("A", 1, true).unwrap();
    fire_timers(&mut player);

    let (token, request) = player.device().last_play().unwrap();
    let result = player.handle_device_event(DeviceEvent::new(
        token,
        DeviceEventKind::PlayRejected {
            request,
            reason: "NotAllowedError".to_string(),
        },
    ));

    assert!(matches!(result, Err(PlayerError::PlaybackRejected(_))));
    assert!(result.unwrap_err().is_reported());
    assert!(!player.is_playing());
    assert_eq!(player.status(), Some(Status::TapToPlay));

    player.play().unwrap();
    confirm_play(&mut player);
    assert!(player.is_playing());
    assert_eq!(player.status(), None);
}

#[test]
fn test_pause_is_idempotent() {
    let mut player = player();
    start_playing(&mut player, "B", 1);

    player.pause();
    player.pause();
    assert!(!player.is_playing());
    assert_eq!(player.phase(), PlayerPhase::Paused);
}

#[test]
fn test_late_play_confirmation_after_pause_is_ignored() {
    let mut player = player();
    player.load_tour("B", 1, false).unwrap();
    player.play().unwrap();
    let (token, request) = player.device().last_play().unwrap();

    player.pause();
    player
        .handle_device_event(DeviceEvent::new(
            token,
            DeviceEventKind::PlayStarted { request },
        ))
        .unwrap();
    assert!(!player.is_playing());
}

#[test]
fn test_stop_rewinds() {
    let mut player = player();
    start_playing(&mut player, "A", 2);
    set_duration(&mut player, 300);
    device_event(
        &mut player,
        DeviceEventKind::TimeUpdate {
            position: Duration::from_secs(100),
        },
    );

    player.stop();
    assert!(!player.is_playing());
    assert_eq!(player.state().position, Duration::ZERO);
    assert_eq!(player.phase(), PlayerPhase::Loaded);
    assert_eq!(player.progress().duration_label, "5:00");
}

#[test]
fn test_replay_rewinds_and_plays() {
    let mut player = player();
    player.load_tour("A", 2, false).unwrap();
    player.device_mut().position = Duration::from_secs(42);

    player.replay().unwrap();
    assert_eq!(player.device().position, Duration::ZERO);
    confirm_play(&mut player);
    assert!(player.is_playing());
}

#[test]
fn test_time_update_clamped_to_duration() {
    let mut player = player();
    player.load_tour("A", 1, false).unwrap();
    set_duration(&mut player, 10);
    device_event(
        &mut player,
        DeviceEventKind::TimeUpdate {
            position: Duration::from_secs(11),
        },
    );
    assert_eq!(player.state().position, Duration::from_secs(10));
    assert_eq!(player.progress().percent, 100.0);
}

// ===== Navigation =====

#[test]
fn test_navigation_keeps_play_intent() {
    let mut player = player();
    start_playing(&mut player, "B", 3);

    player.next_track().unwrap();
    assert_eq!(player.active_track(), Some(4));
    let timers = scheduled_timers(&player.drain_events());
    assert_eq!(timers.len(), 1, "autoplay requested after navigation");

    player.load_tour("B", 3, false).unwrap();
    player.previous_track().unwrap();
    assert_eq!(player.active_track(), Some(2));
    assert!(scheduled_timers(&player.drain_events()).is_empty());
}

#[test]
fn test_navigation_noop_at_boundaries() {
    let mut player = player();
    player.load_tour("A", 1, false).unwrap();
    let loads = player.device().count_loads();
    player.previous_track().unwrap();
    assert_eq!(player.active_track(), Some(1));

    player.load_track(6, false).unwrap();
    player.next_track().unwrap();
    assert_eq!(player.active_track(), Some(6));
    assert_eq!(player.device().count_loads(), loads + 1);
}

// ===== Ended / auto-advance =====

#[test]
fn test_ended_before_last_track_auto_advances() {
    let mut player = player();
    start_playing(&mut player, "A", 2);

    device_event(&mut player, DeviceEventKind::Ended);
    assert!(!player.is_playing());
    assert_eq!(player.phase(), PlayerPhase::Ended);
    assert_eq!(player.status(), Some(Status::LoadingNextTrack));

    let timers = scheduled_timers(&player.drain_events());
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].1, 1500);

    player.handle_timer(timers[0].0).unwrap();
    assert_eq!(player.active_track(), Some(3));

    // autoplay follows
    fire_timers(&mut player);
    confirm_play(&mut player);
    assert!(player.is_playing());
}

#[test]
fn test_ended_at_last_track_completes_tour() {
    let mut player = player();
    start_playing(&mut player, "A", 6);

    device_event(&mut player, DeviceEventKind::Ended);
    let events = player.drain_events();
    assert!(scheduled_timers(&events).is_empty());
    assert!(events
        .iter()
        .any(|event| matches!(event, PlayerEvent::TourCompleted { .. })));
    assert!(player.is_tour_complete());
    assert_eq!(player.status(), Some(Status::TourComplete));
    assert_eq!(player.active_track(), Some(6));
    assert_eq!(player.phase(), PlayerPhase::Ended);
}

#[test]
fn test_manual_navigation_cancels_auto_advance() {
    let mut player = player();
    start_playing(&mut player, "B", 2);

    device_event(&mut player, DeviceEventKind::Ended);
    let timers = scheduled_timers(&player.drain_events());
    assert!(player.is_auto_advance_pending());

    player.previous_track().unwrap();
    let events = player.drain_events();
    assert!(events
        .iter()
        .any(|event| matches!(event, PlayerEvent::TimerCancelled { id } if *id == timers[0].0)));
    assert!(!player.is_auto_advance_pending());

    player.handle_timer(timers[0].0).unwrap();
    assert_eq!(player.active_track(), Some(1));
}

#[test]
fn test_pause_during_auto_advance_clears_next_track_status() {
    let mut player = player();
    start_playing(&mut player, "A", 2);
    device_event(&mut player, DeviceEventKind::Ended);
    assert_eq!(player.status(), Some(Status::LoadingNextTrack));

    player.pause();
    assert!(!player.is_auto_advance_pending());
    assert_eq!(player.status(), None);
    assert!(player
        .drain_events()
        .contains(&PlayerEvent::StatusChanged { status: None }));
}

#[test]
fn test_replaying_current_track_during_auto_advance() {
    let mut player = player();
    start_playing(&mut player, "A", 2);
    device_event(&mut player, DeviceEventKind::Ended);

    player.play().unwrap();
    confirm_play(&mut player);

    assert!(player.is_playing());
    assert_eq!(player.active_track(), Some(2));
    assert!(!player.is_auto_advance_pending());
    assert_eq!(player.status(), None);
}

// ===== Device events =====

#[test]
fn test_stale_device_events_dropped() {
    let mut player = player();
    player.load_tour("A", 1, false).unwrap();
    let stale = player.load_token();
    player.load_track(2, false).unwrap();

    player
        .handle_device_event(DeviceEvent::new(stale, DeviceEventKind::Ended))
        .unwrap();
    player
        .handle_device_event(DeviceEvent::new(
            stale,
            DeviceEventKind::Error(DeviceErrorKind::Network),
        ))
        .unwrap();

    assert_eq!(player.phase(), PlayerPhase::Loaded);
    assert_eq!(player.status(), None);
    assert!(!player.is_auto_advance_pending());
}

#[test]
fn test_device_events_ignored_while_idle() {
    let mut player = player();
    let token = player.load_token();

    for kind in [
        DeviceEventKind::MetadataLoaded {
            duration: Duration::from_secs(60),
        },
        DeviceEventKind::Ended,
        DeviceEventKind::Error(DeviceErrorKind::Network),
        DeviceEventKind::Waiting,
    ] {
        player
            .handle_device_event(DeviceEvent::new(token, kind))
            .unwrap();
    }

    assert_eq!(player.phase(), PlayerPhase::Idle);
    assert_eq!(player.active_tour(), None);
    assert_eq!(player.state().duration, None);
    assert_eq!(player.status(), None);
    assert!(!player.has_pending_events());
}

#[test]
fn test_device_error_forces_not_playing() {
    let mut player = player();
    start_playing(&mut player, "B", 5);

    let token = player.load_token();
    let err = player
        .handle_device_event(DeviceEvent::new(
            token,
            DeviceEventKind::Error(DeviceErrorKind::Decode),
        ))
        .unwrap_err();

    assert!(matches!(err, PlayerError::Device(DeviceErrorKind::Decode)));
    assert!(err.is_reported());
    assert!(!player.is_playing());
    assert_eq!(player.phase(), PlayerPhase::Error);
    assert_eq!(player.status(), Some(Status::Device(DeviceErrorKind::Decode)));

    player.next_track().unwrap();
    assert_eq!(player.phase(), PlayerPhase::Loaded);
    assert_eq!(player.status(), None);
}

#[test]
fn test_buffering_status_toggles() {
    let mut player = player();
    player.load_tour("A", 1, false).unwrap();

    device_event(&mut player, DeviceEventKind::Waiting);
    assert_eq!(player.status(), Some(Status::Buffering));
    device_event(&mut player, DeviceEventKind::CanPlay);
    assert_eq!(player.status(), None);
}

#[test]
fn test_stale_autoplay_timer_ignored() {
    let mut player = player();
    player.load_tour("A", 1, true).unwrap();
    let timers = scheduled_timers(&player.drain_events());

    player.load_track(2, false).unwrap();
    player.handle_timer(timers[0].0).unwrap();
    assert!(player.device().last_play().is_none());
}

// ===== Keyboard =====

#[test]
fn test_keyboard_shortcuts() {
    let mut player = player();
    start_playing(&mut player, "B", 4);
    set_duration(&mut player, 25);

    player.device_mut().position = Duration::from_secs(20);
    assert!(player.handle_key(Key::ArrowRight, KeyTarget::Page).unwrap());
    assert_eq!(player.state().position, Duration::from_secs(25));

    player.device_mut().position = Duration::from_secs(4);
    player.handle_key(Key::ArrowLeft, KeyTarget::Page).unwrap();
    assert_eq!(player.state().position, Duration::ZERO);

    player.handle_key(Key::Space, KeyTarget::Page).unwrap();
    assert!(!player.is_playing());

    player.handle_key(Key::ArrowDown, KeyTarget::Page).unwrap();
    assert_eq!(player.active_track(), Some(5));
    player.handle_key(Key::ArrowUp, KeyTarget::Page).unwrap();
    assert_eq!(player.active_track(), Some(4));

    assert!(!player.handle_key(Key::ArrowDown, KeyTarget::TextInput).unwrap());
    assert!(!player.handle_key(Key::Other, KeyTarget::Page).unwrap());
    assert_eq!(player.active_track(), Some(4));
}

#[test]
fn test_seek_keys_need_duration() {
    let mut player = player();
    player.load_tour("A", 1, false).unwrap();
    assert!(matches!(
        player.handle_key(Key::ArrowRight, KeyTarget::Page),
        Err(PlayerError::SeekUnavailable)
    ));
}

#[test]
fn test_timer_delays_follow_settings() {
    let mut player = player();
    player.load_tour("A", 1, true).unwrap();
    let timers = scheduled_timers(&player.drain_events());
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].1, 100);
    assert_eq!(player.pending_timers(), 1);
    assert!(!player.is_auto_advance_pending());
}

// ===== Event serialization =====

#[test]
fn test_events_serialize_for_the_host() {
    let mut player = player();
    player.load_tour("b", 3, true).unwrap();
    let events = player.drain_events();

    let (id, _) = scheduled_timers(&events)[0];
    let timer = events
        .iter()
        .find(|event| matches!(event, PlayerEvent::TimerScheduled { .. }))
        .unwrap();
    assert_eq!(
        serde_json::to_value(timer).unwrap(),
        serde_json::json!({ "TimerScheduled": { "id": id.get(), "delay_ms": 100 } })
    );

    let changed = events
        .iter()
        .find(|event| matches!(event, PlayerEvent::TrackChanged { .. }))
        .unwrap();
    let value = serde_json::to_value(changed).unwrap();
    assert_eq!(value["TrackChanged"]["tour"], "B");
    assert_eq!(value["TrackChanged"]["track"], 3);

    let json = serde_json::to_string(&events).unwrap();
    let back: Vec<PlayerEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, events);
}
