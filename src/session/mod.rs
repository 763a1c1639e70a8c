//! The render run: discovery, parallel preparation, the ordered legend fold and the sinks.

pub mod timelapse;

pub use timelapse::{Reveal, RunReport, SaveReport, TimelapseSession};
