//! Audio device backed by a JavaScript object
//!
//! The object must provide:
//!
//! ```js
//! {
//!   load(src, token) {},
//!   play(token, request) {},   // report back via player.onPlayStarted / onPlayRejected
//!   pause() {},
//!   seek(seconds) {},
//!   position() { return seconds; },
//! }
//! ```

use crate::device::AudioDevice;
use crate::types::{LoadToken, PlayRequestId};
use audiotour_core::AudioRef;
use js_sys::{Function, Reflect};
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub struct JsAudioDevice {
    target: JsValue,
}

impl JsAudioDevice {
    pub fn new(target: JsValue) -> Self {
        Self { target }
    }

    fn method(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.target, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    }

    fn call(&self, name: &str, args: &[JsValue]) -> Option<JsValue> {
        let Some(method) = self.method(name) else {
            warn!(method = name, "Audio device method missing");
            return None;
        };

        let result = match args {
            [] => method.call0(&self.target),
            [a] => method.call1(&self.target, a),
            [a, b, ..] => method.call2(&self.target, a, b),
        };

        match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(method = name, error = ?err, "Audio device call failed");
                None
            }
        }
    }
}

impl AudioDevice for JsAudioDevice {
    fn load(&mut self, source: &AudioRef, token: LoadToken) {
        self.call(
            "load",
            &[
                JsValue::from_str(source.as_str()),
                JsValue::from_f64(token.get() as f64),
            ],
        );
    }

    fn play(&mut self, token: LoadToken, request: PlayRequestId) {
        self.call(
            "play",
            &[
                JsValue::from_f64(token.get() as f64),
                JsValue::from_f64(request.get() as f64),
            ],
        );
    }

    fn pause(&mut self) {
        self.call("pause", &[]);
    }

    fn seek(&mut self, position: Duration) {
        self.call("seek", &[JsValue::from_f64(position.as_secs_f64())]);
    }

    fn position(&self) -> Duration {
        self.call("position", &[])
            .and_then(|value| value.as_f64())
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or_default()
    }
}
