use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{LapseError, LapseResult};
use crate::render::FrameRGBA;

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Consumer of finished frames.
///
/// `begin` is called once, before any frame, and only when at least one frame exists.
/// `push_frame` is called in strictly increasing `FrameIndex` order. `end` is called once after
/// the last frame.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> LapseResult<()>;
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LapseResult<()>;
    fn end(&mut self) -> LapseResult<()>;
}

/// Reject a frame whose size differs from what the sink was begun with.
pub(crate) fn check_frame_size(cfg: &SinkConfig, frame: &FrameRGBA) -> LapseResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(LapseError::encode(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != frame.canvas().byte_len() {
        return Err(LapseError::encode(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

/// Reject a frame index that does not advance past the previous one.
pub(crate) fn check_frame_order(last: Option<FrameIndex>, idx: FrameIndex) -> LapseResult<()> {
    if let Some(prev) = last
        && idx <= prev
    {
        return Err(LapseError::encode(format!(
            "frame {} pushed after frame {}",
            idx.0, prev.0
        )));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if the sink was begun.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in sequence order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LapseResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LapseResult<()> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(LapseError::encode("in-memory sink was not begun"));
        };
        check_frame_size(cfg, frame)?;
        check_frame_order(self.frames.last().map(|(i, _)| *i), idx)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LapseResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
