//! subway-lapse turns the history of a transit-map builder's save files into an annotated
//! time-lapse.
//!
//! Every save contributes one frame: its SVG thumbnail rasterized to a square, with a cumulative
//! legend naming each line the first time it appears and a box with the network length and
//! station count. The public API is session-oriented:
//!
//! - Load and validate a [`Config`]
//! - Create a [`TimelapseSession`]
//! - [`run`](TimelapseSession::run) it, or stream frames into your own [`FrameSink`]s
#![forbid(unsafe_code)]

pub mod config;
pub mod encode;
mod foundation;
pub mod geometry;
pub mod legend;
pub mod render;
pub mod save;
pub mod session;

pub use crate::config::{Config, MAX_TARGET_RES};
pub use crate::encode::{FrameSink, GifSink, InMemorySink, LastFramePngSink, SinkConfig};
pub use crate::foundation::color::ColorKey;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8};
pub use crate::foundation::error::{LapseError, LapseResult};
pub use crate::geometry::{GeometrySummary, LengthUnit};
pub use crate::legend::{LegendRow, LegendShape, LegendState, LineDescriptor, NamePool};
pub use crate::render::{FrameRGBA, SvgFonts};
pub use crate::save::{SaveEntry, SaveFile, discover_saves};
pub use crate::session::{Reveal, RunReport, SaveReport, TimelapseSession};
