//! Save folder discovery and the save-file JSON model.

pub mod discover;
pub mod model;

pub use discover::{SaveEntry, discover_saves, newest_save};
pub use model::{SaveData, SaveFile};
