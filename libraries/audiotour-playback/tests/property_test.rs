//! Property-based tests for the tour player
//!
//! Uses proptest to check the clamping, boundary and location invariants
//! over every tour in the built-in catalog.

mod common;

use audiotour_core::TourCatalog;
use audiotour_playback::{DeviceEventKind, PlayerPhase};
use common::*;
use proptest::prelude::*;
use std::time::Duration;

fn tour_id() -> impl Strategy<Value = String> {
    prop_oneof![Just("A"), Just("a"), Just("B"), Just("b")].prop_map(str::to_string)
}

proptest! {
    /// Property: loading a tour clamps the requested track into range
    #[test]
    fn load_tour_clamps_track(id in tour_id(), requested in 0u32..=u32::MAX) {
        let catalog = TourCatalog::builtin();
        let count = catalog.get(&id).unwrap().track_count();

        let mut player = player();
        player.load_tour(&id, requested, false).unwrap();

        prop_assert_eq!(player.active_track(), Some(requested.clamp(1, count)));
    }

    /// Property: the location's track parameter follows the loaded track
    #[test]
    fn location_round_trip(id in tour_id(), track in 1u32..=8) {
        let mut player = player_at("https://venue.example/tour.html?tour=A&track=1&autoplay=1");
        player.load_tour(&id, track, false).unwrap();

        let params = player.location().params();
        prop_assert_eq!(Some(params.track), player.active_track());
        prop_assert!(params.autoplay, "other parameters are preserved");
    }

    /// Property: navigation flags are off exactly at the boundaries
    #[test]
    fn navigation_flags_match_boundaries(id in tour_id(), track in 1u32..=8) {
        let mut player = player();
        player.load_tour(&id, track, false).unwrap();
        let active = player.active_track().unwrap();
        let count = player.catalog().get(&id).unwrap().track_count();

        let display = player.display().unwrap().clone();
        prop_assert_eq!(display.previous_enabled, active != 1);
        prop_assert_eq!(display.next_enabled, active != count);

        player.previous_track().unwrap();
        let after_previous = player.active_track().unwrap();
        prop_assert_eq!(after_previous, if active == 1 { 1 } else { active - 1 });

        player.load_track(active, false).unwrap();
        player.next_track().unwrap();
        let after_next = player.active_track().unwrap();
        prop_assert_eq!(after_next, if active == count { count } else { active + 1 });
    }

    /// Property: position never exceeds a known duration
    #[test]
    fn position_bounded_by_duration(
        duration in 1u64..3_600,
        updates in prop::collection::vec(0u64..7_200, 1..20),
    ) {
        let mut player = player();
        player.load_tour("B", 1, false).unwrap();
        set_duration(&mut player, duration);

        for position in updates {
            device_event(&mut player, DeviceEventKind::TimeUpdate {
                position: Duration::from_secs(position),
            });
            prop_assert!(player.state().position <= Duration::from_secs(duration));
            let percent = player.progress().percent;
            prop_assert!((0.0..=100.0).contains(&percent));
        }
    }

    /// Property: seeking always lands inside the track
    #[test]
    fn seek_to_stays_in_range(duration in 1u64..3_600, percent in -1e6f64..1e6) {
        let mut player = player();
        player.load_tour("A", 1, false).unwrap();
        set_duration(&mut player, duration);

        player.seek_to(percent).unwrap();
        prop_assert!(player.state().position <= Duration::from_secs(duration));
    }

    /// Property: pause is idempotent in every phase
    #[test]
    fn pause_twice_never_plays(playing in any::<bool>()) {
        let mut player = player();
        if playing {
            start_playing(&mut player, "A", 1);
        } else {
            player.load_tour("A", 1, false).unwrap();
        }

        player.pause();
        player.pause();
        prop_assert!(!player.is_playing());
        prop_assert_ne!(player.phase(), PlayerPhase::Playing);
    }
}
