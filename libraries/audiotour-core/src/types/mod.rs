//! Domain types for tours and tracks

mod ids;
mod tour;

pub use ids::TourId;
pub use tour::{AudioRef, Tour, Track};
