//! Network length and station aggregation for a single save.

pub mod geodesic;
pub mod network;
pub mod summary;

pub use geodesic::{geodesic_km, great_circle_km};
pub use network::{Coord, LaneType, Track, TrackGroup, TrackId};
pub use summary::{GeometrySummary, KM_TO_MI, LengthUnit, summarize, summarize_with};
