//! Core domain types for lsvedit

mod gold;
mod save;
mod status;

pub use gold::{EditableField, GoldItem, GoldState};
pub use save::{ExtractedSave, SaveEntry, SaveMetadata};
pub use status::{StatusChannel, StatusClock, StatusKind, StatusLine};
