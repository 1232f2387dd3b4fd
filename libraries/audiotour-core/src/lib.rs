//! Audiotour Core
//!
//! Platform-agnostic building blocks shared by the Audiotour crates.
//!
//! This crate provides:
//! - **Domain Types**: `TourId`, `Tour`, `Track`, `AudioRef`
//! - **Catalog**: the immutable `TourCatalog`, built in or loaded from TOML
//! - **Navigation**: query parameters, deep links and the page location
//! - **Settings**: layered configuration (file + environment)
//! - **Error Handling**: unified `TourError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use audiotour_core::{NavigationParams, TourCatalog};
//!
//! let catalog = TourCatalog::builtin();
//! let params = NavigationParams::from_query("tour=b&track=99&autoplay=1");
//!
//! let tour = catalog.get(params.tour.as_deref().unwrap()).unwrap();
//! assert_eq!(tour.name, "Roaring Twenties");
//! assert_eq!(tour.clamp_track(params.track), 8);
//! assert!(params.autoplay);
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod settings;
pub mod types;

pub use catalog::TourCatalog;
pub use error::{Result, TourError};
pub use navigation::{DeepLink, NavigationParams, PageLocation};
pub use settings::{CacheSettings, PageSettings, PlayerSettings, ScannerSettings, Settings};
pub use types::{AudioRef, Tour, TourId, Track};
