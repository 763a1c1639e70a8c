use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};

use crate::encode::sink::{FrameSink, SinkConfig, check_frame_order, check_frame_size};
use crate::encode::{ensure_parent_dir, flatten_to_opaque_rgba8};
use crate::foundation::core::{FrameIndex, Rgba8};
use crate::foundation::error::{LapseError, LapseResult};
use crate::render::FrameRGBA;

/// NeuQuant sampling factor, 1 (best) ..= 30 (fastest).
const QUANTIZE_SPEED: i32 = 10;

/// Looping animated GIF, one palette per frame.
pub struct GifSink {
    path: PathBuf,
    background: Rgba8,
    state: Option<GifState>,
    frames_written: u64,
}

struct GifState {
    cfg: SinkConfig,
    delay: image::Delay,
    encoder: GifEncoder<BufWriter<File>>,
    last: Option<FrameIndex>,
}

impl GifSink {
    /// `background` is what translucent pixels are flattened over; GIF has no partial alpha.
    pub fn new(path: impl Into<PathBuf>, background: Rgba8) -> Self {
        Self {
            path: path.into(),
            background,
            state: None,
            frames_written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> LapseResult<()> {
        ensure_parent_dir(&self.path)?;
        let file = File::create(&self.path)
            .with_context(|| format!("failed to create gif '{}'", self.path.display()))?;

        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), QUANTIZE_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| LapseError::encode(format!("gif repeat: {e}")))?;

        let (num, den) = cfg.fps.frame_delay_ms_ratio();
        self.state = Some(GifState {
            cfg,
            delay: image::Delay::from_numer_denom_ms(num, den),
            encoder,
            last: None,
        });
        self.frames_written = 0;
        tracing::debug!(
            path = %self.path.display(),
            width = cfg.width,
            height = cfg.height,
            delay_ms = cfg.fps.frame_delay_ms(),
            "gif sink begun"
        );
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LapseResult<()> {
        let Some(state) = self.state.as_mut() else {
            return Err(LapseError::encode("gif sink was not begun"));
        };
        check_frame_size(&state.cfg, frame)?;
        check_frame_order(state.last, idx)?;

        let mut rgba = vec![0u8; frame.data.len()];
        flatten_to_opaque_rgba8(
            &mut rgba,
            &frame.data,
            frame.premultiplied,
            self.background.to_array(),
        )?;
        let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
            .ok_or_else(|| LapseError::encode("gif frame buffer has the wrong length"))?;

        state
            .encoder
            .encode_frame(image::Frame::from_parts(img, 0, 0, state.delay))
            .map_err(|e| LapseError::encode(format!("gif frame {}: {e}", idx.0)))?;
        state.last = Some(idx);
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> LapseResult<()> {
        let Some(state) = self.state.take() else {
            return Ok(());
        };
        // The trailer is written when the encoder drops.
        drop(state);
        tracing::info!(path = %self.path.display(), frames = self.frames_written, "saved gif");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
