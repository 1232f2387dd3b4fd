//! Tour player - the playback controller
//!
//! Owns tour/track selection, playback state and the page location. Commands
//! come from the UI, device events from the [`AudioDevice`], timer firings
//! from the host. Every reaction is queued as a [`PlayerEvent`] for the UI
//! layer to drain.

use crate::{
    device::{AudioDevice, DeviceEvent, DeviceEventKind},
    display::{ProgressDisplay, TrackDisplay},
    error::{PlayerError, Result},
    events::PlayerEvent,
    keyboard::{self, Key, KeyCommand, KeyTarget},
    status::{Status, StatusKind},
    timers::{TimerAction, TimerQueue},
    types::{LoadToken, PlayRequestId, PlaybackState, PlayerPhase, TimerId},
};
use audiotour_core::{PageLocation, PlayerSettings, Tour, TourCatalog, TourId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tour playback controller
///
/// One instance per page session. Single-threaded: the host calls into it from
/// UI handlers, device callbacks and timer callbacks, then drains the events.
pub struct TourPlayer<D: AudioDevice> {
    catalog: Arc<TourCatalog>,
    settings: PlayerSettings,
    device: D,
    location: PageLocation,

    state: PlaybackState,
    phase: PlayerPhase,

    /// Token of the most recent load
    load_token: LoadToken,

    /// Outstanding play request, cleared once answered or invalidated
    play_request: Option<PlayRequestId>,
    last_request: PlayRequestId,

    timers: TimerQueue,
    status: Option<Status>,
    display: Option<TrackDisplay>,
    tour_complete: bool,

    pending_events: Vec<PlayerEvent>,
}

impl<D: AudioDevice> TourPlayer<D> {
    /// Create an idle player for the page at `location`
    pub fn new(
        catalog: Arc<TourCatalog>,
        settings: PlayerSettings,
        device: D,
        location: PageLocation,
    ) -> Self {
        Self {
            catalog,
            settings,
            device,
            location,
            state: PlaybackState::default(),
            phase: PlayerPhase::Idle,
            load_token: LoadToken::default(),
            play_request: None,
            last_request: PlayRequestId::default(),
            timers: TimerQueue::new(),
            status: None,
            display: None,
            tour_complete: false,
            pending_events: Vec::new(),
        }
    }

    /// Apply the navigational parameters of the page location
    ///
    /// Without a `tour` parameter the player stays idle.
    pub fn init(&mut self) -> Result<()> {
        let params = self.location.params();
        let Some(tour) = params.tour else {
            debug!("No tour in page location, staying idle");
            return Ok(());
        };

        info!(tour = %tour, track = params.track, autoplay = params.autoplay, "Initializing from page location");
        self.load_tour(&tour, params.track, params.autoplay)
    }

    // ===== Loading =====

    /// Load a tour at `track` (clamped into the tour's range)
    ///
    /// Unknown tours leave the state untouched and show "tour not found".
    pub fn load_tour(&mut self, tour_id: &str, track: u32, autoplay: bool) -> Result<()> {
        let catalog = Arc::clone(&self.catalog);
        let Some(tour) = catalog.get(tour_id) else {
            warn!(tour = tour_id, "Tour not found");
            self.set_status(Some(Status::TourNotFound));
            return Err(PlayerError::TourNotFound(tour_id.to_string()));
        };

        let number = tour.clamp_track(track);
        if number != track {
            debug!(tour = %tour.id, requested = track, clamped = number, "Clamped track number");
        }
        self.apply_load(tour, number, autoplay)
    }

    /// Load a track of the active tour
    pub fn load_track(&mut self, track: u32, autoplay: bool) -> Result<()> {
        let catalog = Arc::clone(&self.catalog);
        let tour = self.active_tour_in(&catalog)?;
        self.apply_load(tour, track, autoplay)
    }

    fn apply_load(&mut self, tour: &Tour, number: u32, autoplay: bool) -> Result<()> {
        let Some(track) = tour.track(number) else {
            warn!(tour = %tour.id, track = number, "Track not found");
            self.set_status(Some(Status::TrackNotFound));
            return Err(PlayerError::TrackNotFound {
                tour: tour.id.clone(),
                track: number,
            });
        };

        let tour_changed = self.state.active_tour.as_ref() != Some(&tour.id);

        self.cancel_timers();
        self.load_token = self.load_token.next();
        self.play_request = None;
        self.tour_complete = false;

        self.state = PlaybackState {
            active_tour: Some(tour.id.clone()),
            active_track: number,
            is_playing: false,
            position: Duration::ZERO,
            duration: None,
        };

        info!(tour = %tour.id, track = number, token = %self.load_token, autoplay, "Loading track");
        self.device.load(&track.audio, self.load_token);

        let display = TrackDisplay::for_track(tour, track);
        self.display = Some(display.clone());
        self.pending_events.push(PlayerEvent::DisplayChanged(display));
        self.emit_progress();

        self.location.set_track(number);
        self.pending_events.push(PlayerEvent::LocationReplaced {
            url: self.location.to_string(),
        });

        self.set_status(None);
        self.pending_events.push(PlayerEvent::TrackChanged {
            tour: tour.id.clone(),
            track: number,
            token: self.load_token,
        });
        self.set_phase(PlayerPhase::Loaded);

        if tour_changed && self.settings.precache_on_tour_load {
            let urls = tour.audio_refs().map(ToString::to_string).collect();
            self.pending_events.push(PlayerEvent::PrecacheRequested { urls });
        }

        if autoplay {
            self.schedule(TimerAction::Autoplay, self.settings.autoplay_grace());
        }

        Ok(())
    }

    // ===== Playback control =====

    /// Request playback start
    ///
    /// The state only flips to playing once the device confirms.
    pub fn play(&mut self) -> Result<()> {
        self.require_tour()?;
        self.cancel_timers();

        self.last_request = self.last_request.next();
        self.play_request = Some(self.last_request);
        debug!(token = %self.load_token, request = self.last_request.get(), "Requesting playback");
        self.device.play(self.load_token, self.last_request);
        Ok(())
    }

    /// Pause playback (idempotent)
    pub fn pause(&mut self) {
        self.cancel_timers();
        self.play_request = None;
        if !self.state.has_tour() {
            return;
        }

        self.device.pause();
        if self.state.is_playing {
            debug!(position = ?self.state.position, "Paused");
            self.state.is_playing = false;
            self.set_phase(PlayerPhase::Paused);
        }
    }

    /// Toggle between play and pause
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.state.is_playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Pause and rewind to the start of the track
    pub fn stop(&mut self) {
        self.pause();
        if !self.state.has_tour() {
            return;
        }

        self.device.seek(Duration::ZERO);
        self.state.position = Duration::ZERO;
        if self.phase != PlayerPhase::Error {
            self.set_phase(PlayerPhase::Loaded);
        }
        self.emit_progress();
    }

    /// Rewind to the start of the track and play
    pub fn replay(&mut self) -> Result<()> {
        self.require_tour()?;
        self.device.seek(Duration::ZERO);
        self.state.position = Duration::ZERO;
        self.emit_progress();
        self.play()
    }

    /// Seek to `percent` (0-100) of the track
    ///
    /// Needs a known duration. Out-of-range or non-finite values are clamped.
    pub fn seek_to(&mut self, percent: f64) -> Result<()> {
        self.require_tour()?;
        let duration = self.state.duration.ok_or(PlayerError::SeekUnavailable)?;

        let percent = if percent.is_finite() {
            percent.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let target = duration.mul_f64(percent / 100.0);
        self.seek(target);
        Ok(())
    }

    /// Seek forward one step, stopping at the end of the track
    pub fn skip_forward(&mut self) -> Result<()> {
        self.require_tour()?;
        let duration = self.state.duration.ok_or(PlayerError::SeekUnavailable)?;
        let target = (self.device.position() + self.settings.seek_step()).min(duration);
        self.seek(target);
        Ok(())
    }

    /// Seek back one step, stopping at the start of the track
    pub fn skip_backward(&mut self) -> Result<()> {
        self.require_tour()?;
        let duration = self.state.duration.ok_or(PlayerError::SeekUnavailable)?;
        let target = self
            .device
            .position()
            .saturating_sub(self.settings.seek_step())
            .min(duration);
        self.seek(target);
        Ok(())
    }

    fn seek(&mut self, target: Duration) {
        debug!(position = ?target, "Seeking");
        self.device.seek(target);
        self.state.position = target;
        self.emit_progress();
    }

    // ===== Track navigation =====

    /// Go to the previous track, keeping the play/pause intent
    ///
    /// No-op at the first track.
    pub fn previous_track(&mut self) -> Result<()> {
        let catalog = Arc::clone(&self.catalog);
        let tour = self.active_tour_in(&catalog)?;
        if tour.is_first(self.state.active_track) {
            return Ok(());
        }
        self.load_track(self.state.active_track - 1, self.state.is_playing)
    }

    /// Go to the next track, keeping the play/pause intent
    ///
    /// No-op at the last track.
    pub fn next_track(&mut self) -> Result<()> {
        let catalog = Arc::clone(&self.catalog);
        let tour = self.active_tour_in(&catalog)?;
        if tour.is_last(self.state.active_track) {
            return Ok(());
        }
        self.load_track(self.state.active_track + 1, self.state.is_playing)
    }

    // ===== Device events =====

    /// React to an event reported by the audio device
    ///
    /// Events tagged with a superseded load token, or arriving before any
    /// tour is loaded, are dropped.
    pub fn handle_device_event(&mut self, event: DeviceEvent) -> Result<()> {
        if event.token != self.load_token {
            debug!(event_token = %event.token, current = %self.load_token, kind = ?event.kind, "Dropping stale device event");
            return Ok(());
        }
        if !self.state.has_tour() {
            debug!(kind = ?event.kind, "Dropping device event without a loaded tour");
            return Ok(());
        }

        match event.kind {
            DeviceEventKind::MetadataLoaded { duration } => {
                debug!(?duration, "Metadata loaded");
                self.state.duration = Some(duration);
                self.state.position = self.state.position.min(duration);
                self.emit_progress();
            }
            DeviceEventKind::TimeUpdate { position } => {
                self.state.position = match self.state.duration {
                    Some(duration) => position.min(duration),
                    None => position,
                };
                self.emit_progress();
            }
            DeviceEventKind::Ended => self.on_ended(),
            DeviceEventKind::Error(kind) => {
                warn!(error = %kind, token = %self.load_token, "Audio device error");
                self.cancel_timers();
                self.play_request = None;
                self.state.is_playing = false;
                self.set_phase(PlayerPhase::Error);
                self.set_status(Some(Status::Device(kind)));
                return Err(PlayerError::Device(kind));
            }
            DeviceEventKind::Waiting => {
                if self.status.map(Status::kind) != Some(StatusKind::Error) {
                    self.set_status(Some(Status::Buffering));
                }
            }
            DeviceEventKind::CanPlay => {
                if self.status == Some(Status::Buffering) {
                    self.set_status(None);
                }
            }
            DeviceEventKind::PlayStarted { request } => {
                if self.play_request != Some(request) {
                    debug!(request = request.get(), "Ignoring superseded play confirmation");
                    return Ok(());
                }
                self.play_request = None;
                self.state.is_playing = true;
                self.set_phase(PlayerPhase::Playing);
                if matches!(self.status, Some(Status::TapToPlay) | Some(Status::TourComplete)) {
                    self.set_status(None);
                }
            }
            DeviceEventKind::PlayRejected { request, reason } => {
                if self.play_request != Some(request) {
                    debug!(request = request.get(), "Ignoring superseded play rejection");
                    return Ok(());
                }
                info!(%reason, "Playback rejected by device");
                self.play_request = None;
                self.state.is_playing = false;
                self.set_status(Some(Status::TapToPlay));
                self.emit_state();
                return Err(PlayerError::PlaybackRejected(reason));
            }
        }

        Ok(())
    }

    fn on_ended(&mut self) {
        self.play_request = None;
        self.state.is_playing = false;
        if let Some(duration) = self.state.duration {
            self.state.position = duration;
        }
        self.set_phase(PlayerPhase::Ended);

        let catalog = Arc::clone(&self.catalog);
        let Some(tour) = self
            .state
            .active_tour
            .as_ref()
            .and_then(|id| catalog.get_by_id(id))
        else {
            return;
        };

        if tour.is_last(self.state.active_track) {
            info!(tour = %tour.id, "Tour complete");
            self.tour_complete = true;
            self.set_status(Some(Status::TourComplete));
            self.pending_events.push(PlayerEvent::TourCompleted {
                tour: tour.id.clone(),
            });
        } else {
            debug!(tour = %tour.id, track = self.state.active_track, "Track ended, advancing");
            self.set_status(Some(Status::LoadingNextTrack));
            self.schedule(TimerAction::AutoAdvance, self.settings.auto_advance_delay());
        }
    }

    // ===== Timers =====

    /// Fire a timer previously announced with `TimerScheduled`
    ///
    /// Cancelled, unknown or stale timers are ignored.
    pub fn handle_timer(&mut self, id: TimerId) -> Result<()> {
        let Some(timer) = self.timers.take(id) else {
            debug!(timer = %id, "Ignoring cancelled timer");
            return Ok(());
        };
        if timer.token != self.load_token {
            debug!(timer = %id, token = %timer.token, "Ignoring stale timer");
            return Ok(());
        }

        match timer.action {
            TimerAction::Autoplay => self.play(),
            TimerAction::AutoAdvance => self.load_track(self.state.active_track + 1, true),
        }
    }

    fn schedule(&mut self, action: TimerAction, delay: Duration) {
        let id = self.timers.schedule(self.load_token, action);
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        debug!(timer = %id, ?action, delay_ms, "Scheduling timer");
        self.pending_events
            .push(PlayerEvent::TimerScheduled { id, delay_ms });
    }

    fn cancel_timers(&mut self) {
        if self.timers.is_pending(TimerAction::AutoAdvance)
            && self.status == Some(Status::LoadingNextTrack)
        {
            self.set_status(None);
        }
        for id in self.timers.cancel_all() {
            debug!(timer = %id, "Cancelling timer");
            self.pending_events.push(PlayerEvent::TimerCancelled { id });
        }
    }

    // ===== Keyboard =====

    /// Run the shortcut bound to `key`
    ///
    /// Returns `Ok(true)` when the key was handled (the host should then
    /// prevent the default action).
    pub fn handle_key(&mut self, key: Key, target: KeyTarget) -> Result<bool> {
        let Some(command) = keyboard::command_for(key, target) else {
            return Ok(false);
        };

        match command {
            KeyCommand::TogglePlayPause => self.toggle_play_pause()?,
            KeyCommand::SeekBackward => self.skip_backward()?,
            KeyCommand::SeekForward => self.skip_forward()?,
            KeyCommand::PreviousTrack => self.previous_track()?,
            KeyCommand::NextTrack => self.next_track()?,
        }
        Ok(true)
    }

    // ===== State queries =====

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn active_tour(&self) -> Option<&TourId> {
        self.state.active_tour.as_ref()
    }

    /// Active track number, `None` without a tour
    pub fn active_track(&self) -> Option<u32> {
        self.state.has_tour().then_some(self.state.active_track)
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Track panel of the loaded track
    pub fn display(&self) -> Option<&TrackDisplay> {
        self.display.as_ref()
    }

    pub fn progress(&self) -> ProgressDisplay {
        ProgressDisplay::from_state(&self.state)
    }

    /// Whether the last track of the tour finished
    pub fn is_tour_complete(&self) -> bool {
        self.tour_complete
    }

    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    pub fn catalog(&self) -> &TourCatalog {
        &self.catalog
    }

    pub fn load_token(&self) -> LoadToken {
        self.load_token
    }

    /// Number of timers waiting to be fired
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether an auto-advance is waiting to be fired
    pub fn is_auto_advance_pending(&self) -> bool {
        self.timers.is_pending(TimerAction::AutoAdvance)
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal helpers =====

    fn require_tour(&self) -> Result<()> {
        if self.state.has_tour() {
            Ok(())
        } else {
            Err(PlayerError::NoActiveTour)
        }
    }

    fn active_tour_in<'a>(&self, catalog: &'a TourCatalog) -> Result<&'a Tour> {
        let id = self
            .state
            .active_tour
            .as_ref()
            .ok_or(PlayerError::NoActiveTour)?;
        catalog
            .get_by_id(id)
            .ok_or_else(|| PlayerError::TourNotFound(id.to_string()))
    }

    fn set_status(&mut self, status: Option<Status>) {
        if self.status != status {
            self.status = status;
            self.pending_events.push(PlayerEvent::StatusChanged { status });
        }
    }

    fn set_phase(&mut self, phase: PlayerPhase) {
        if self.phase != phase {
            debug!(from = %self.phase, to = %phase, "Phase change");
            self.phase = phase;
        }
        self.emit_state();
    }

    fn emit_state(&mut self) {
        self.pending_events.push(PlayerEvent::StateChanged {
            phase: self.phase,
            is_playing: self.state.is_playing,
        });
    }

    fn emit_progress(&mut self) {
        self.pending_events
            .push(PlayerEvent::ProgressChanged(ProgressDisplay::from_state(
                &self.state,
            )));
    }
}
