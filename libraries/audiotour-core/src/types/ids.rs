/// ID types for Audiotour entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tour identifier
///
/// Tour ids are case-insensitive. The id is normalized to upper case when it
/// is constructed, so `"a"` and `"A"` compare equal everywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TourId(String);

impl TourId {
    /// Create a new tour ID, normalizing case and surrounding whitespace
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_uppercase())
    }

    /// Get the normalized string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty after normalization
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TourId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TourId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&str> for TourId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<TourId> for String {
    fn from(id: TourId) -> Self {
        id.0
    }
}
