//! WASM-compatible TourPlayer wrapper

use super::device::JsAudioDevice;
use crate::device::{DeviceErrorKind, DeviceEvent, DeviceEventKind};
use crate::keyboard::{Key, KeyTarget};
use crate::scanner::{self, ScannerStartError};
use crate::types::{LoadToken, PlayRequestId, TimerId};
use crate::{PlayerError, TourPlayer};
use audiotour_core::{PageSettings, PlayerSettings, TourCatalog};
use js_sys::Function;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;

/// Tour player for the browser
///
/// Every call flushes the queued player events to the `onEvent` callback.
#[wasm_bindgen]
pub struct WasmTourPlayer {
    inner: TourPlayer<JsAudioDevice>,
    tour_page: String,
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmTourPlayer {
    /// Create a player with the built-in tours
    ///
    /// `device` is the JS audio device object, `location` the page URL.
    #[wasm_bindgen(constructor)]
    pub fn new(device: JsValue, location: &str) -> Result<WasmTourPlayer, JsValue> {
        console_error_panic_hook::set_once();
        Self::build(TourCatalog::builtin(), device, location)
    }

    /// Create a player with a TOML catalog
    #[wasm_bindgen(js_name = withCatalog)]
    pub fn with_catalog(
        catalog_toml: &str,
        device: JsValue,
        location: &str,
    ) -> Result<WasmTourPlayer, JsValue> {
        console_error_panic_hook::set_once();
        let catalog = TourCatalog::from_toml(catalog_toml).map_err(to_js)?;
        Self::build(catalog, device, location)
    }

    fn build(catalog: TourCatalog, device: JsValue, location: &str) -> Result<Self, JsValue> {
        let location = audiotour_core::PageLocation::parse(location).map_err(to_js)?;
        Ok(Self {
            inner: TourPlayer::new(
                Arc::new(catalog),
                PlayerSettings::default(),
                JsAudioDevice::new(device),
                location,
            ),
            tour_page: PageSettings::default().tour_page,
            on_event: None,
        })
    }

    /// Apply the page location's parameters
    ///
    /// A bad location only shows a status message; it never throws.
    pub fn init(&mut self) {
        let result = self.inner.init();
        self.settle("init", result);
    }

    // ===== Loading =====

    #[wasm_bindgen(js_name = loadTour)]
    pub fn load_tour(&mut self, tour: &str, track: u32, autoplay: bool) -> Result<(), JsValue> {
        let result = self.inner.load_tour(tour, track, autoplay);
        self.finish(result)
    }

    #[wasm_bindgen(js_name = loadTrack)]
    pub fn load_track(&mut self, track: u32, autoplay: bool) -> Result<(), JsValue> {
        let result = self.inner.load_track(track, autoplay);
        self.finish(result)
    }

    // ===== Playback Control =====

    pub fn play(&mut self) -> Result<(), JsValue> {
        let result = self.inner.play();
        self.finish(result)
    }

    pub fn pause(&mut self) {
        self.inner.pause();
        self.flush();
    }

    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&mut self) -> Result<(), JsValue> {
        let result = self.inner.toggle_play_pause();
        self.finish(result)
    }

    pub fn stop(&mut self) {
        self.inner.stop();
        self.flush();
    }

    pub fn replay(&mut self) -> Result<(), JsValue> {
        let result = self.inner.replay();
        self.finish(result)
    }

    /// Seek by percentage (0 - 100)
    #[wasm_bindgen(js_name = seekTo)]
    pub fn seek_to(&mut self, percent: f64) -> Result<(), JsValue> {
        let result = self.inner.seek_to(percent);
        self.finish(result)
    }

    #[wasm_bindgen(js_name = previousTrack)]
    pub fn previous_track(&mut self) -> Result<(), JsValue> {
        let result = self.inner.previous_track();
        self.finish(result)
    }

    #[wasm_bindgen(js_name = nextTrack)]
    pub fn next_track(&mut self) -> Result<(), JsValue> {
        let result = self.inner.next_track();
        self.finish(result)
    }

    /// Keyboard shortcut; returns true when the default action should be prevented
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str, target_tag: &str) -> bool {
        let result = self
            .inner
            .handle_key(Key::from_dom_key(key), KeyTarget::from_tag_name(target_tag));
        self.flush();
        result.unwrap_or(true)
    }

    #[wasm_bindgen(js_name = handleTimer)]
    pub fn handle_timer(&mut self, id: f64) {
        let result = self.inner.handle_timer(TimerId::from_raw(id as u64));
        self.settle("timer", result);
    }

    // ===== Device callbacks =====
    //
    // Called from media element listeners and promise handlers; never throw.

    #[wasm_bindgen(js_name = onMetadataLoaded)]
    pub fn on_metadata_loaded(&mut self, token: f64, duration_secs: f64) {
        // Streams report an infinite duration
        if let Ok(duration) = Duration::try_from_secs_f64(duration_secs) {
            self.device_event(token, DeviceEventKind::MetadataLoaded { duration });
        }
    }

    #[wasm_bindgen(js_name = onTimeUpdate)]
    pub fn on_time_update(&mut self, token: f64, position_secs: f64) {
        let position = Duration::try_from_secs_f64(position_secs).unwrap_or_default();
        self.device_event(token, DeviceEventKind::TimeUpdate { position })
    }

    #[wasm_bindgen(js_name = onEnded)]
    pub fn on_ended(&mut self, token: f64) {
        self.device_event(token, DeviceEventKind::Ended)
    }

    /// `code` is the media error code (`MediaError.code`)
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&mut self, token: f64, code: u16) {
        let kind = DeviceErrorKind::from_media_error_code(code);
        self.device_event(token, DeviceEventKind::Error(kind))
    }

    #[wasm_bindgen(js_name = onWaiting)]
    pub fn on_waiting(&mut self, token: f64) {
        self.device_event(token, DeviceEventKind::Waiting)
    }

    #[wasm_bindgen(js_name = onCanPlay)]
    pub fn on_can_play(&mut self, token: f64) {
        self.device_event(token, DeviceEventKind::CanPlay)
    }

    #[wasm_bindgen(js_name = onPlayStarted)]
    pub fn on_play_started(&mut self, token: f64, request: f64) {
        let request = PlayRequestId::from_raw(request as u64);
        self.device_event(token, DeviceEventKind::PlayStarted { request })
    }

    #[wasm_bindgen(js_name = onPlayRejected)]
    pub fn on_play_rejected(&mut self, token: f64, request: f64, reason: String) {
        let request = PlayRequestId::from_raw(request as u64);
        self.device_event(token, DeviceEventKind::PlayRejected { request, reason })
    }

    // ===== Scanner =====

    /// Href for a decoded QR code
    #[wasm_bindgen(js_name = interpretScan)]
    pub fn interpret_scan(&self, text: &str) -> Result<String, JsValue> {
        scanner::interpret_scan(text, self.inner.catalog())
            .map(|target| target.href(&self.tour_page))
            .map_err(to_js)
    }

    /// Message for a camera start failure, by DOM exception name
    #[wasm_bindgen(js_name = scannerStartMessage)]
    pub fn scanner_start_message(name: &str) -> String {
        ScannerStartError::from_dom_name(name).message().to_string()
    }

    // ===== State =====

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.is_playing()
    }

    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.inner.state()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = getLocation)]
    pub fn get_location(&self) -> String {
        self.inner.location().to_string()
    }

    /// Register the event callback; receives one serialized `PlayerEvent` per call
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
        self.flush();
    }

    // ===== Internal =====

    fn device_event(&mut self, token: f64, kind: DeviceEventKind) {
        let event = DeviceEvent::new(LoadToken::from_raw(token as u64), kind);
        let result = self.inner.handle_device_event(event);
        self.settle("device event", result);
    }

    /// Flush and log instead of throwing
    fn settle(&mut self, origin: &'static str, result: Result<(), PlayerError>) {
        self.flush();
        match result {
            Ok(()) => {}
            Err(err) if err.is_reported() => debug!(origin, error = %err, "Handled"),
            Err(err) => warn!(origin, error = %err, "Ignored"),
        }
    }

    fn finish(&mut self, result: Result<(), PlayerError>) -> Result<(), JsValue> {
        self.flush();
        result.map_err(to_js)
    }

    fn flush(&mut self) {
        let Some(callback) = self.on_event.as_ref() else {
            return;
        };
        for event in self.inner.drain_events() {
            if let Ok(value) = serde_wasm_bindgen::to_value(&event) {
                callback.call1(&JsValue::NULL, &value).ok();
            }
        }
    }
}

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}
