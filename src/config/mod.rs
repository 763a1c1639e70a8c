//! Run configuration, loaded once from `config.json` and optionally overridden from the CLI.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::color::ColorKey;
use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::foundation::error::{LapseError, LapseResult};
use crate::geometry::LengthUnit;
use crate::legend::NamePool;

/// Largest accepted raster side, in pixels.
pub const MAX_TARGET_RES: u32 = 16_384;

/// All options of a render run. Every field has a default except `save_folder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder holding the `*.json` saves.
    pub save_folder: PathBuf,
    /// Folder receiving `<output_name>.gif` / `<output_name>_LAST.png`.
    pub output_folder: PathBuf,
    pub output_name: String,
    /// Frames per second; fractional rates such as `0.5` are allowed.
    pub fps: f64,
    /// Side of the square raster frames, in pixels.
    pub target_res: u32,
    /// Rasterization worker count.
    pub threads: usize,
    /// Saves prepared per parallel batch. `0` picks `threads * 2`.
    pub chunk_size: usize,
    pub add_legend: bool,
    pub background_color: ColorKey,
    pub export_gif: bool,
    /// Stroke width forced onto every thumbnail path before rasterizing.
    pub line_width: f32,
    pub export_last_png: bool,
    pub show_stations: bool,
    pub show_length: bool,
    pub unit: LengthUnit,
    pub color_to_name: NamePool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_folder: PathBuf::new(),
            output_folder: PathBuf::from("."),
            output_name: "output".to_owned(),
            fps: 1.0,
            target_res: 2000,
            threads: 4,
            chunk_size: 0,
            add_legend: true,
            background_color: ColorKey::from_rgb(0x1e, 0x1e, 0x1e),
            export_gif: true,
            line_width: 2.5,
            export_last_png: false,
            show_stations: true,
            show_length: true,
            unit: LengthUnit::Km,
            color_to_name: NamePool::new(),
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> LapseResult<Self> {
        serde_json::from_str(s).map_err(|e| LapseError::serde(format!("config: {e}")))
    }

    pub fn from_json_file(path: &Path) -> LapseResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> LapseResult<()> {
        if self.save_folder.as_os_str().is_empty() {
            return Err(LapseError::validation("save_folder must be set"));
        }
        if self.output_name.trim().is_empty() {
            return Err(LapseError::validation("output_name must be non-empty"));
        }
        if self.output_name.contains(['/', '\\']) {
            return Err(LapseError::validation(
                "output_name must be a file stem, not a path",
            ));
        }
        self.fps()?;
        if self.target_res == 0 || self.target_res > MAX_TARGET_RES {
            return Err(LapseError::validation(format!(
                "target_res must be in 1..={MAX_TARGET_RES}, got {}",
                self.target_res
            )));
        }
        if self.threads == 0 {
            return Err(LapseError::validation("threads must be >= 1"));
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            return Err(LapseError::validation("line_width must be finite and > 0"));
        }
        for (color, entry) in self.color_to_name.iter() {
            if entry.names.is_empty() {
                return Err(LapseError::validation(format!(
                    "color_to_name[{color}] must list at least one name"
                )));
            }
        }
        Ok(())
    }

    pub fn fps(&self) -> LapseResult<Fps> {
        Fps::from_f64(self.fps)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::square(self.target_res)
    }

    pub fn background_rgba(&self) -> Rgba8 {
        self.background_color.to_rgba8()
    }

    pub fn effective_chunk_size(&self) -> usize {
        if self.chunk_size == 0 {
            self.threads.max(1) * 2
        } else {
            self.chunk_size
        }
    }

    pub fn gif_path(&self) -> PathBuf {
        self.output_folder.join(format!("{}.gif", self.output_name))
    }

    pub fn last_png_path(&self) -> PathBuf {
        self.output_folder
            .join(format!("{}_LAST.png", self.output_name))
    }

    /// `true` when the run would write anything.
    pub fn exports_anything(&self) -> bool {
        self.export_gif || self.export_last_png
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/load.rs"]
mod tests;
