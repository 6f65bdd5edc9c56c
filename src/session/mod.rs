//! Save editing session state.
//!
//! This module owns everything between the command gateway and a frontend:
//! which saves exist, which one is open, what its gold looks like and what
//! each component last reported. It holds no I/O of its own; every effect
//! goes through the injected [`SaveBackend`](crate::backend::SaveBackend).
//!
//! # Architecture
//!
//! A [`SaveSession`] composes four independent components:
//!
//! - **[`SaveCatalog`]** - lists the saves folder and tracks the selection.
//! - **[`ExtractionController`]** - unpacks one archive at a time and issues
//!   the [`ExtractedSave`](crate::domain::ExtractedSave) token the editor
//!   requires.
//! - **[`GoldEditor`]** - the load / edit / commit lifecycle for the gold
//!   amount of the extracted save.
//! - **[`LslibProbe`]** - checks whether the extraction toolchain is usable.
//!
//! Each component writes to its own status channel; [`SaveSession::status`]
//! surfaces whichever channel wrote last.
//!
//! # Example
//!
//! ```rust,ignore
//! use lsvedit::backend::DivineBackend;
//! use lsvedit::session::SaveSession;
//!
//! let backend = Arc::new(DivineBackend::new(&config));
//! let mut session = SaveSession::new(backend, &config.saves_folder);
//!
//! session.catalog.list_saves().await;
//! if let Some(message) = session.open_selected().await? {
//!     println!("{message}");
//! }
//! ```

mod catalog;
mod editor;
mod extraction;
mod probe;

pub use catalog::SaveCatalog;
pub use editor::{CommitOutcome, EditorState, GoldEditor, parse_new_save_path};
pub use extraction::ExtractionController;
pub use probe::LslibProbe;

use std::sync::Arc;

use tracing::debug;

use crate::backend::SaveBackend;
use crate::domain::{StatusChannel, StatusClock, StatusLine};
use crate::gateway::{CommandError, CommandGateway};

/// One editing session over one backend
///
/// Components are public so callers can drive them directly; the methods
/// here cover the flows that span more than one component.
pub struct SaveSession {
    pub catalog: SaveCatalog,
    pub extraction: ExtractionController,
    pub gold: GoldEditor,
    pub lslib: LslibProbe,
    channels: [StatusChannel; 4],
}

impl SaveSession {
    pub fn new(backend: Arc<dyn SaveBackend>, saves_folder: impl Into<String>) -> Self {
        let gateway = CommandGateway::new(backend);
        let clock = StatusClock::new();
        let channels = [
            clock.channel(),
            clock.channel(),
            clock.channel(),
            clock.channel(),
        ];
        Self {
            catalog: SaveCatalog::new(gateway.clone(), channels[0].clone(), saves_folder),
            extraction: ExtractionController::new(gateway.clone(), channels[1].clone()),
            gold: GoldEditor::new(gateway.clone(), channels[2].clone()),
            lslib: LslibProbe::new(gateway, channels[3].clone()),
            channels,
        }
    }

    /// The most recently written status line across all components
    pub fn status(&self) -> Option<StatusLine> {
        self.channels
            .iter()
            .filter_map(StatusChannel::last_update)
            .max_by_key(|(stamp, _)| *stamp)
            .map(|(_, line)| line)
    }

    /// Whether gold data from the current extraction is loaded
    pub fn is_loaded(&self) -> bool {
        self.gold.is_loaded()
    }

    /// Whether the gold draft diverges from the committed value
    pub fn has_changes(&self) -> bool {
        self.gold.has_changes()
    }

    /// Whether a listing or a commit is in flight
    pub fn is_busy(&self) -> bool {
        self.catalog.is_loading() || self.gold.is_saving()
    }

    /// Extract `save_path` and load its metadata and gold
    ///
    /// Replaces whatever was open before. Returns the backend's extraction
    /// message; an extraction failure leaves the session with nothing open.
    pub async fn open_save(&mut self, save_path: &str) -> Result<String, CommandError> {
        self.gold.reset();
        self.extraction.reset();

        let message = self.extraction.extract(save_path).await?;
        self.extraction.read_metadata().await;
        if let Some(extracted) = self.extraction.extracted() {
            self.gold.load(extracted).await;
        }
        Ok(message)
    }

    /// Open the catalog's selected save, if there is one
    pub async fn open_selected(&mut self) -> Result<Option<String>, CommandError> {
        let Some(path) = self.catalog.selected().map(str::to_string) else {
            debug!("no save selected, nothing to open");
            return Ok(None);
        };
        self.open_save(&path).await.map(Some)
    }

    /// Commit the gold draft, then follow the new archive if one was written
    ///
    /// When the backend's result names a new save, the extraction moves to
    /// it and the editor reloads from it, so the session ends up on the
    /// archive that actually contains the change.
    pub async fn commit_gold(&mut self) -> Result<CommitOutcome, CommandError> {
        let Some(extracted) = self.extraction.extracted().cloned() else {
            debug!("commit requested without an extracted save");
            return Ok(CommitOutcome::Skipped);
        };

        let Self {
            gold, extraction, ..
        } = self;
        let outcome = gold
            .commit(&extracted, |new_path| async move {
                extraction.extract(&new_path).await?;
                extraction.read_metadata().await;
                Ok(())
            })
            .await?;

        if outcome == CommitOutcome::SavedAndReloaded {
            if let Some(token) = self.extraction.extracted() {
                self.gold.load(token).await;
            }
        }
        Ok(outcome)
    }

    /// Close the open save, keeping the catalog as is
    pub fn reset(&mut self) {
        self.gold.reset();
        self.extraction.reset();
    }
}
