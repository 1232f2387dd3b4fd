//! Keyboard shortcuts
//!
//! | Key   | Command                |
//! |-------|------------------------|
//! | Space | toggle play/pause      |
//! | Left  | seek back one step     |
//! | Right | seek forward one step  |
//! | Up    | previous track         |
//! | Down  | next track             |
//!
//! Shortcuts are ignored while focus is in a text field.

use serde::{Deserialize, Serialize};

/// Keys the player reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            " " | "Spacebar" => Key::Space,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            _ => Key::Other,
        }
    }
}

/// Element that had focus when the key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyTarget {
    Page,
    TextInput,
    TextArea,
}

impl KeyTarget {
    /// Map a DOM `tagName`
    pub fn from_tag_name(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("INPUT") {
            KeyTarget::TextInput
        } else if tag.eq_ignore_ascii_case("TEXTAREA") {
            KeyTarget::TextArea
        } else {
            KeyTarget::Page
        }
    }

    pub fn is_text_entry(self) -> bool {
        matches!(self, KeyTarget::TextInput | KeyTarget::TextArea)
    }
}

/// Player command bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCommand {
    TogglePlayPause,
    SeekBackward,
    SeekForward,
    PreviousTrack,
    NextTrack,
}

/// Command for `key`, or `None` when the key is unbound or focus is in a text field
pub fn command_for(key: Key, target: KeyTarget) -> Option<KeyCommand> {
    if target.is_text_entry() {
        return None;
    }

    match key {
        Key::Space => Some(KeyCommand::TogglePlayPause),
        Key::ArrowLeft => Some(KeyCommand::SeekBackward),
        Key::ArrowRight => Some(KeyCommand::SeekForward),
        Key::ArrowUp => Some(KeyCommand::PreviousTrack),
        Key::ArrowDown => Some(KeyCommand::NextTrack),
        Key::Other => None,
    }
}
