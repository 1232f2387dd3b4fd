//! Tracing bootstrap
//!
//! Hosts call [`init`] once at start-up. `RUST_LOG` wins over the default
//! filter when it is set.

use crate::error::{Result, TourError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str =
    "audiotour_core=info,audiotour_playback=info,audiotour_cache=info";

/// Install a global fmt subscriber filtered by `RUST_LOG` or `default_filter`
///
/// # Errors
/// Returns `TourError::Logging` if a global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| TourError::Logging(e.to_string()))
}
