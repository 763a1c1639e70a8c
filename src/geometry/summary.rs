use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::geometry::geodesic::geodesic_km;
use crate::geometry::network::{Coord, Track, TrackGroup, TrackId};

pub const KM_TO_MI: f64 = 0.621_371;

/// Display unit for network length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    #[serde(alias = "kilometers", alias = "KM")]
    Km,
    #[serde(alias = "miles", alias = "MI")]
    Mi,
}

impl LengthUnit {
    pub fn from_km(self, km: f64) -> f64 {
        match self {
            Self::Km => km,
            Self::Mi => km * KM_TO_MI,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Km => "km",
            Self::Mi => "mi",
        }
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" | "kilometers" => Ok(Self::Km),
            "mi" | "miles" => Ok(Self::Mi),
            other => Err(format!("unknown length unit \"{other}\" (expected km or mi)")),
        }
    }
}

/// Network totals for one save.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometrySummary {
    pub network_length: f64,
    pub unit: LengthUnit,
    pub station_count: usize,
}

impl GeometrySummary {
    /// `"12.3 km"`
    pub fn length_label(&self) -> String {
        format!("{:.1} {}", self.network_length, self.unit.label())
    }
}

/// Deduplicated network length and station count using the WGS-84 geodesic.
pub fn summarize<S>(
    tracks: &[Track],
    groups: &[TrackGroup],
    stations: &[S],
    unit: LengthUnit,
) -> GeometrySummary {
    summarize_with(tracks, groups, stations, unit, geodesic_km)
}

/// [`summarize`] with an injected `distance_km` function.
///
/// Each physical segment is counted once per save, no matter how many tracks traverse it; the
/// first track to reach it credits `distance / lane_divisor`.
pub fn summarize_with<S, F>(
    tracks: &[Track],
    groups: &[TrackGroup],
    stations: &[S],
    unit: LengthUnit,
    distance_km: F,
) -> GeometrySummary
where
    F: Fn(Coord, Coord) -> f64,
{
    let divisors = lane_divisors(groups);
    let mut seen = HashSet::<SegmentKey>::new();
    let mut total_km = 0.0;

    for track in tracks {
        let divisor = f64::from(divisors.get(&track.id).copied().unwrap_or(1));
        for pair in track.coords.windows(2) {
            let (p1, p2) = (pair[0], pair[1]);
            if !p1.is_finite() || !p2.is_finite() {
                continue;
            }
            if seen.insert(SegmentKey::new(p1, p2)) {
                total_km += distance_km(p1, p2) / divisor;
            }
        }
    }

    GeometrySummary {
        network_length: unit.from_km(total_km),
        unit,
        station_count: stations.len(),
    }
}

/// Track id -> lane divisor. A track listed in several groups keeps the largest divisor.
fn lane_divisors(groups: &[TrackGroup]) -> HashMap<&TrackId, u32> {
    let mut out = HashMap::<&TrackId, u32>::new();
    for group in groups {
        let d = group.lane_type.divisor();
        for id in &group.track_ids {
            let slot = out.entry(id).or_insert(1);
            *slot = (*slot).max(d);
        }
    }
    out
}

/// Direction-independent identity of a segment, exact to the bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SegmentKey([u64; 2], [u64; 2]);

impl SegmentKey {
    fn new(p1: Coord, p2: Coord) -> Self {
        // `+ 0.0` folds -0.0 into 0.0.
        let (p1, p2) = (
            Coord::new(p1.lon + 0.0, p1.lat + 0.0),
            Coord::new(p2.lon + 0.0, p2.lat + 0.0),
        );
        let bits = |p: Coord| [p.lon.to_bits(), p.lat.to_bits()];

        let ordered = p1
            .lon
            .total_cmp(&p2.lon)
            .then(p1.lat.total_cmp(&p2.lat))
            .is_le();
        if ordered {
            Self(bits(p1), bits(p2))
        } else {
            Self(bits(p2), bits(p1))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/summary.rs"]
mod tests;
