//! Pending timers
//!
//! The player never owns a clock. It records what should happen after a
//! delay, hands the host a [`TimerId`], and acts when the host fires it.

use crate::types::{LoadToken, TimerId};
use serde::{Deserialize, Serialize};

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Request playback once the freshly loaded source had time to get ready
    Autoplay,

    /// Load the next track after the current one ended
    AutoAdvance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingTimer {
    pub id: TimerId,
    pub token: LoadToken,
    pub action: TimerAction,
}

/// Timers waiting for the host to fire them
#[derive(Debug, Default)]
pub(crate) struct TimerQueue {
    next_id: u64,
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a timer for `action` bound to the load `token`
    pub fn schedule(&mut self, token: LoadToken, action: TimerAction) -> TimerId {
        self.next_id += 1;
        let id = TimerId::from_raw(self.next_id);
        self.pending.push(PendingTimer { id, token, action });
        id
    }

    /// Remove and return the timer with `id`, if it is still pending
    pub fn take(&mut self, id: TimerId) -> Option<PendingTimer> {
        let index = self.pending.iter().position(|timer| timer.id == id)?;
        Some(self.pending.remove(index))
    }

    /// Drop every pending timer, returning their ids
    pub fn cancel_all(&mut self) -> Vec<TimerId> {
        self.pending.drain(..).map(|timer| timer.id).collect()
    }

    pub fn is_pending(&self, action: TimerAction) -> bool {
        self.pending.iter().any(|timer| timer.action == action)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
