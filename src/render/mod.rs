//! Thumbnail rasterization and frame annotation.
//!
//! Each save's SVG thumbnail becomes one square frame; [`OverlayRenderer`] then draws the
//! cumulative legend and the network stats on top of it.

pub mod fonts;
pub mod frame;
pub mod overlay;
pub mod thumbnail;

pub use fonts::SvgFonts;
pub use frame::FrameRGBA;
pub use overlay::{OverlayOpts, OverlayRenderer};
pub use thumbnail::{
    RenderedThumbnail, line_descriptors, override_stroke_width, parse_tree, rasterize,
    render_thumbnail,
};
