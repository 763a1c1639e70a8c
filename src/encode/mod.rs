//! Output sinks.
//!
//! Sinks consume finished frames in sequence order and are driven by
//! [`TimelapseSession`](crate::TimelapseSession).

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{LapseError, LapseResult};

/// Animated GIF output.
pub mod gif;
/// Final-frame PNG output.
pub mod png;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;

pub use gif::GifSink;
pub use png::LastFramePngSink;
pub use sink::{FrameSink, InMemorySink, SinkConfig};

pub fn ensure_parent_dir(path: &Path) -> LapseResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Composite RGBA8 `src` over `bg_rgba` into fully opaque RGBA8 `dst`.
pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> LapseResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LapseError::encode(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [bg_rgba[0] as u16, bg_rgba[1] as u16, bg_rgba[2] as u16];

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                s[c] as u16
            } else {
                mul_div255(s[c] as u16, a)
            };
            d[c] = (fg + mul_div255(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Drop the alpha channel of opaque RGBA8.
pub(crate) fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        out.extend_from_slice(&px[..3]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/flatten.rs"]
mod tests;
