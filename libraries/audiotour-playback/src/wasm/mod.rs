//! WASM bindings for audiotour-playback
//!
//! Exposes the tour player to the browser. The page owns the `<audio>`
//! element and the timers; this module forwards commands to it and feeds its
//! callbacks back into the player.

#[cfg(feature = "wasm")]
pub mod device;

#[cfg(feature = "wasm")]
pub mod player;

#[cfg(feature = "wasm")]
pub use device::JsAudioDevice;

#[cfg(feature = "wasm")]
pub use player::WasmTourPlayer;
