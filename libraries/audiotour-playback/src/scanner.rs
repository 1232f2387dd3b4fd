//! Scan-code interpretation
//!
//! The camera and QR decoding live in the host. This module decides what a
//! decoded string means and tracks the scan session around it:
//!
//! - `A` or `b/3`: a tour code, opened through a deep link with autoplay
//! - `https://venue.example/tour.html?tour=A`: a tour link, opened unchanged
//! - anything else: rejected, scanning resumes

use crate::error::{PlayerError, Result};
use crate::status::Status;
use audiotour_core::navigation::{parse_track_param, TOUR_PARAM};
use audiotour_core::{DeepLink, ScannerSettings, TourCatalog};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Frame errors containing this text mean "nothing in view"
const NO_CODE_IN_FRAME: &str = "No QR code found";

/// Where a scanned code leads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanTarget {
    /// Tour code, opened on the tour page
    Tour(DeepLink),

    /// Link to a tour page, followed as is
    Link(String),
}

impl ScanTarget {
    /// Href to navigate to
    pub fn href(&self, tour_page: &str) -> String {
        match self {
            ScanTarget::Tour(link) => link.href(tour_page),
            ScanTarget::Link(href) => href.clone(),
        }
    }
}

/// Interpret a decoded scan
///
/// Tour codes must name a tour in the catalog. Links are accepted when an
/// absolute URL mentions `tour` in its path or carries a `tour` parameter, or
/// when a relative link mentions `tour`.
pub fn interpret_scan(text: &str, catalog: &TourCatalog) -> Result<ScanTarget> {
    let text = text.trim();

    if let Some((letter, track)) = parse_tour_code(text) {
        if let Some(tour) = catalog.get(letter) {
            return Ok(ScanTarget::Tour(DeepLink::new(tour.id.clone(), track, true)));
        }
        debug!(code = text, "Tour code does not match any tour");
    }

    if is_tour_link(text) {
        return Ok(ScanTarget::Link(text.to_string()));
    }

    Err(PlayerError::InvalidScanCode(text.to_string()))
}

/// Split `X` or `X/<digits>` into tour letter and track number
fn parse_tour_code(text: &str) -> Option<(&str, u32)> {
    let mut chars = text.char_indices();
    let (_, first) = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }

    let (letter, rest) = text.split_at(first.len_utf8());
    if rest.is_empty() {
        return Some((letter, 1));
    }

    let digits = rest.strip_prefix('/')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((letter, parse_track_param(digits)))
}

fn is_tour_link(text: &str) -> bool {
    match Url::parse(text) {
        Ok(url) => {
            url.path().contains("tour") || url.query_pairs().any(|(key, _)| key == TOUR_PARAM)
        }
        Err(_) => !text.starts_with("http") && text.contains("tour"),
    }
}

/// Scan session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScanState {
    /// Camera not running
    #[default]
    Idle,

    /// Waiting for a code
    Listening,

    /// Rejected a code, waiting to listen again
    Paused,

    /// A code was accepted; the host navigates away
    Resolved,
}

/// Outcome of a decoded scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDecision {
    /// Stop the camera and navigate
    Navigate { target: ScanTarget, href: String },

    /// Show `status`, then call `ScanSession::resume` after `resume_after`
    Rejected {
        status: Status,
        resume_after: Duration,
    },
}

/// One camera scanning session
#[derive(Debug, Clone)]
pub struct ScanSession {
    state: ScanState,
    tour_page: String,
    rescan_delay: Duration,
}

impl ScanSession {
    pub fn new(tour_page: impl Into<String>, settings: &ScannerSettings) -> Self {
        Self {
            state: ScanState::Idle,
            tour_page: tour_page.into(),
            rescan_delay: settings.rescan_delay(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Camera started
    pub fn start(&mut self) {
        if self.state != ScanState::Listening {
            info!("QR scanner started");
            self.state = ScanState::Listening;
        }
    }

    /// Camera stopped
    pub fn stop(&mut self) {
        if self.state != ScanState::Idle {
            info!("QR scanner stopped");
            self.state = ScanState::Idle;
        }
    }

    /// Listen again after a rejected code
    pub fn resume(&mut self) {
        if self.state == ScanState::Paused {
            self.state = ScanState::Listening;
        }
    }

    /// Decide on a decoded string
    ///
    /// Returns `None` when the session is not listening (duplicate decodes
    /// while the camera winds down).
    pub fn handle_decoded(&mut self, text: &str, catalog: &TourCatalog) -> Option<ScanDecision> {
        if self.state != ScanState::Listening {
            debug!(code = text, state = ?self.state, "Ignoring scan outside listening state");
            return None;
        }

        match interpret_scan(text, catalog) {
            Ok(target) => {
                let href = target.href(&self.tour_page);
                info!(code = text, %href, "QR code accepted");
                self.state = ScanState::Resolved;
                Some(ScanDecision::Navigate { target, href })
            }
            Err(err) => {
                warn!(code = text, error = %err, "QR code rejected");
                self.state = ScanState::Paused;
                Some(ScanDecision::Rejected {
                    status: Status::InvalidScanCode,
                    resume_after: self.rescan_delay,
                })
            }
        }
    }

    /// Per-frame decode failure
    ///
    /// Empty frames are normal and stay silent.
    pub fn handle_frame_error(&self, message: &str) {
        if !message.contains(NO_CODE_IN_FRAME) {
            warn!(error = message, "QR scan error");
        }
    }
}

/// Reasons the camera could not start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScannerStartError {
    PermissionDenied,
    NoCamera,
    CameraBusy,
    NoSuitableCamera,
    Unavailable,
}

impl ScannerStartError {
    /// Map a DOM exception name
    pub fn from_dom_name(name: &str) -> Self {
        match name {
            "NotAllowedError" => ScannerStartError::PermissionDenied,
            "NotFoundError" => ScannerStartError::NoCamera,
            "NotReadableError" => ScannerStartError::CameraBusy,
            "OverconstrainedError" => ScannerStartError::NoSuitableCamera,
            _ => ScannerStartError::Unavailable,
        }
    }

    /// User-facing message
    pub fn message(self) -> &'static str {
        match self {
            ScannerStartError::PermissionDenied => {
                "Camera toegang geweigerd. Geef toestemming in je browser instellingen."
            }
            ScannerStartError::NoCamera => "Geen camera gevonden op dit apparaat.",
            ScannerStartError::CameraBusy => "Camera is in gebruik door een andere app.",
            ScannerStartError::NoSuitableCamera => "Geen geschikte camera beschikbaar.",
            ScannerStartError::Unavailable => "Kan QR-scanner niet starten.",
        }
    }
}

impl fmt::Display for ScannerStartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ScannerStartError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tour_codes() {
        assert_eq!(parse_tour_code("A"), Some(("A", 1)));
        assert_eq!(parse_tour_code("b/3"), Some(("b", 3)));
        assert_eq!(parse_tour_code("B/"), None);
        assert_eq!(parse_tour_code("B/3a"), None);
        assert_eq!(parse_tour_code("AB"), None);
        assert_eq!(parse_tour_code("3"), None);
        assert_eq!(parse_tour_code(""), None);
    }

    #[test]
    fn tour_links() {
        assert!(is_tour_link("https://venue.example/tour.html?tour=A"));
        assert!(is_tour_link("https://venue.example/?tour=A"));
        assert!(is_tour_link("tour.html?tour=B&track=2"));
        assert!(!is_tour_link("https://venue.example/about"));
        assert!(!is_tour_link("http//broken-tour"));
        assert!(!is_tour_link("hello"));
    }

    #[test]
    fn code_must_name_a_known_tour() {
        let catalog = TourCatalog::builtin();
        let target = interpret_scan(" a/2 ", &catalog).unwrap();
        assert_eq!(target.href("tour.html"), "tour.html?tour=A&track=2&autoplay=1");
        assert!(matches!(
            interpret_scan("Z", &catalog),
            Err(PlayerError::InvalidScanCode(_))
        ));
    }

    #[test]
    fn start_errors() {
        assert_eq!(
            ScannerStartError::from_dom_name("NotAllowedError"),
            ScannerStartError::PermissionDenied
        );
        assert_eq!(
            ScannerStartError::from_dom_name("TypeError").message(),
            "Kan QR-scanner niet starten."
        );
    }
}
