//! Cumulative legend assignment.
//!
//! [`LegendState`] is folded over the frames of a run in save order. Each frame reports the
//! [`LineDescriptor`]s visible in its thumbnail; newly visible lines take the next unused name
//! from their color's [`NamePool`] entry and keep it for the rest of the sequence.

pub mod pool;
pub mod state;

pub use pool::{FALLBACK_LINE_NAME, LegendShape, NamePool, NamePoolEntry};
pub use state::{LegendRow, LegendState, LineDescriptor};
