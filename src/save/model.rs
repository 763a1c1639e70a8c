use std::path::Path;

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::foundation::error::{LapseError, LapseResult};
use crate::geometry::{GeometrySummary, LengthUnit, Track, TrackGroup, summarize};

/// The parts of a map-builder save this tool reads. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFile {
    /// Embedded SVG thumbnail of the network.
    #[serde(default)]
    pub route_thumbnail: Option<String>,
    #[serde(default)]
    pub data: SaveData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub track_groups: Vec<TrackGroup>,
    /// Only counted.
    #[serde(default)]
    pub stations: Vec<IgnoredAny>,
}

impl SaveFile {
    pub fn from_slice(bytes: &[u8]) -> LapseResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| LapseError::save(format!("invalid save JSON: {e}")))
    }

    pub fn load(path: &Path) -> LapseResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| LapseError::save(format!("read '{}': {e}", path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| LapseError::save(format!("invalid save JSON in '{}': {e}", path.display())))
    }

    /// Thumbnail markup, if present and non-blank.
    pub fn thumbnail(&self) -> Option<&str> {
        self.route_thumbnail
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    pub fn summarize(&self, unit: LengthUnit) -> GeometrySummary {
        summarize(
            &self.data.tracks,
            &self.data.track_groups,
            &self.data.stations,
            unit,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/save/model.rs"]
mod tests;
