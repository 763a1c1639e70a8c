use std::path::{Path, PathBuf};

use crate::encode::sink::{FrameSink, SinkConfig, check_frame_order, check_frame_size};
use crate::encode::{ensure_parent_dir, flatten_to_opaque_rgba8, rgba_to_rgb};
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{LapseError, LapseResult};
use crate::render::FrameRGBA;

/// Keeps the most recent frame and writes it as an RGB PNG on `end`.
pub struct LastFramePngSink {
    path: PathBuf,
    background: Rgba8,
    cfg: Option<SinkConfig>,
    last: Option<(FrameIndex, FrameRGBA)>,
}

impl LastFramePngSink {
    pub fn new(path: impl Into<PathBuf>, background: Rgba8) -> Self {
        Self {
            path: path.into(),
            background,
            cfg: None,
            last: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSink for LastFramePngSink {
    fn begin(&mut self, cfg: SinkConfig) -> LapseResult<()> {
        self.cfg = Some(cfg);
        self.last = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LapseResult<()> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(LapseError::encode("png sink was not begun"));
        };
        check_frame_size(cfg, frame)?;
        check_frame_order(self.last.as_ref().map(|(i, _)| *i), idx)?;
        self.last = Some((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LapseResult<()> {
        let Some((idx, frame)) = self.last.take() else {
            return Ok(());
        };

        let mut rgba = vec![0u8; frame.data.len()];
        flatten_to_opaque_rgba8(
            &mut rgba,
            &frame.data,
            frame.premultiplied,
            self.background.to_array(),
        )?;
        let img = image::RgbImage::from_raw(frame.width, frame.height, rgba_to_rgb(&rgba))
            .ok_or_else(|| LapseError::encode("png frame buffer has the wrong length"))?;

        ensure_parent_dir(&self.path)?;
        img.save_with_format(&self.path, image::ImageFormat::Png)
            .map_err(|e| {
                LapseError::encode(format!("write png '{}': {e}", self.path.display()))
            })?;
        tracing::info!(path = %self.path.display(), frame = idx.0, "saved last frame");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
