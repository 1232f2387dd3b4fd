//! Navigational input
//!
//! The tour page is addressed by three query parameters:
//! - `tour`: tour id (case-insensitive)
//! - `track`: 1-based track number, default 1
//! - `autoplay`: `1` starts playback immediately
//!
//! [`PageLocation`] models the page's address so the player can rewrite the
//! `track` parameter in place when the visitor moves between tracks.

use crate::error::Result;
use crate::types::TourId;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Query parameter names
pub const TOUR_PARAM: &str = "tour";
pub const TRACK_PARAM: &str = "track";
pub const AUTOPLAY_PARAM: &str = "autoplay";

/// Parameters read from the page's query string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationParams {
    /// Requested tour id, unresolved
    pub tour: Option<String>,

    /// Requested track number (not yet clamped to the tour)
    pub track: u32,

    /// Whether playback should start on load
    pub autoplay: bool,
}

impl Default for NavigationParams {
    fn default() -> Self {
        Self {
            tour: None,
            track: 1,
            autoplay: false,
        }
    }
}

impl NavigationParams {
    /// Parse a raw query string (with or without the leading `?`)
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut tour = None;
        let mut track = None;
        let mut autoplay = None;

        // First occurrence of each parameter wins
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                TOUR_PARAM if tour.is_none() => tour = Some(value.into_owned()),
                TRACK_PARAM if track.is_none() => track = Some(parse_track_param(&value)),
                AUTOPLAY_PARAM if autoplay.is_none() => autoplay = Some(value == "1"),
                _ => {}
            }
        }

        Self {
            tour: tour.filter(|tour| !tour.is_empty()),
            track: track.unwrap_or(1),
            autoplay: autoplay.unwrap_or(false),
        }
    }

    /// Parse the query of a full URL
    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }
}

/// Parse a `track` parameter value
///
/// Leading digits are read like a lenient integer parse; anything missing,
/// unparsable, zero or negative falls back to 1. Oversized numbers saturate
/// and are clamped to the tour later.
pub fn parse_track_param(raw: &str) -> u32 {
    let raw = raw.trim();
    if raw.starts_with('-') {
        return 1;
    }
    let digits: String = raw
        .trim_start_matches('+')
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return 1;
    }
    match digits.parse::<u32>() {
        Ok(0) => 1,
        Ok(n) => n,
        Err(_) => u32::MAX,
    }
}

/// A link that opens a tour at a given track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepLink {
    pub tour: TourId,
    pub track: u32,
    pub autoplay: bool,
}

impl DeepLink {
    /// Create a new deep link
    pub fn new(tour: impl Into<TourId>, track: u32, autoplay: bool) -> Self {
        Self {
            tour: tour.into(),
            track,
            autoplay,
        }
    }

    /// Query string for this link, without the leading `?`
    pub fn query(&self) -> String {
        let mut query = format!(
            "{}={}&{}={}",
            TOUR_PARAM, self.tour, TRACK_PARAM, self.track
        );
        if self.autoplay {
            query.push_str(&format!("&{}=1", AUTOPLAY_PARAM));
        }
        query
    }

    /// Href relative to the site, e.g. `tour.html?tour=B&track=3&autoplay=1`
    pub fn href(&self, tour_page: &str) -> String {
        format!("{}?{}", tour_page, self.query())
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tour, self.track)
    }
}

/// Addressable location of the tour page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    url: Url,
}

impl PageLocation {
    /// Parse an absolute page URL
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            url: Url::parse(raw)?,
        })
    }

    /// Wrap an existing URL
    pub fn from_url(url: Url) -> Self {
        Self { url }
    }

    /// Navigation parameters of the current location
    pub fn params(&self) -> NavigationParams {
        NavigationParams::from_url(&self.url)
    }

    /// Replace the `track` parameter, keeping every other parameter in order
    ///
    /// The first existing `track` pair is replaced in place and any duplicates
    /// are dropped; without one the parameter is appended.
    pub fn set_track(&mut self, track: u32) {
        let pairs: Vec<(String, String)> = self.url.query_pairs().into_owned().collect();
        let value = track.to_string();
        let mut replaced = false;

        {
            let mut serializer = self.url.query_pairs_mut();
            serializer.clear();
            for (key, existing) in &pairs {
                if key == TRACK_PARAM {
                    if !replaced {
                        serializer.append_pair(TRACK_PARAM, &value);
                        replaced = true;
                    }
                } else {
                    serializer.append_pair(key, existing);
                }
            }
            if !replaced {
                serializer.append_pair(TRACK_PARAM, &value);
            }
        }
    }

    /// Copy of this location with a different `track` parameter
    pub fn with_track(&self, track: u32) -> Self {
        let mut next = self.clone();
        next.set_track(track);
        next
    }

    /// Underlying URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Full URL string
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
