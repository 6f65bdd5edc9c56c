//! Save toolchain backends.
//!
//! This module defines the asynchronous boundary between the editing session
//! and whatever actually decodes and re-encodes `.lsv` save archives. The
//! session only ever talks to a [`SaveBackend`] trait object, so the concrete
//! toolchain (LSLib's Divine executable in production, scripted fakes in
//! tests) is swappable without touching session code.
//!
//! # Architecture
//!
//! - **[`SaveBackend`]** - The six-command contract: list saves, extract one,
//!   read its metadata, query gold, rewrite gold into a new archive, and probe
//!   the toolchain.
//! - **[`DivineBackend`]** - Production implementation that shells out to
//!   Divine for archive work and patches gold amounts in the extracted
//!   `WLD_Main_A.lsx` text.
//! - **[`FolderPicker`]** - Collaborator seam for the saves-folder browse
//!   dialog; implementations may be native dialogs or test stubs.
//!
//! # Example
//!
//! ```rust,ignore
//! use lsvedit::backend::{DivineBackend, SaveBackend};
//!
//! let backend = DivineBackend::new(&config);
//! let entries = backend.list_saves(&config.saves_folder).await?;
//! ```

mod divine;
mod lsx;

pub use divine::DivineBackend;

use async_trait::async_trait;

use crate::domain::{GoldState, SaveEntry, SaveMetadata};

/// Failure from a backend command
///
/// `Display` is the bare human-readable message; the command gateway adds the
/// command-name prefix when it surfaces one of these to the session.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The Divine executable is missing, unusable, or reported a failure
    #[error("{0}")]
    Toolchain(String),

    /// A caller-supplied path does not exist or is not usable
    #[error("{0}")]
    InvalidPath(String),

    /// The extraction working area is missing an expected artifact
    #[error("{0}")]
    MissingArtifact(String),

    /// A value failed validation before being written
    #[error("{0}")]
    InvalidValue(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// The command contract between the session and the save toolchain
///
/// All methods are fallible and suspend until the toolchain answers. The
/// string results of `extract_save`, `modify_and_save_gold` and
/// `check_lslib_status` are user-facing and pass through the session
/// verbatim.
#[async_trait]
pub trait SaveBackend: Send + Sync {
    /// Enumerate save archives under `folder_path`, most recent first
    async fn list_saves(&self, folder_path: &str) -> Result<Vec<SaveEntry>, BackendError>;

    /// Read `SaveInfo.json` from the current extraction
    async fn read_save_info(&self) -> Result<SaveMetadata, BackendError>;

    /// Unpack the archive at `save_path` into the working area
    async fn extract_save(&self, save_path: &str) -> Result<String, BackendError>;

    /// Sum the gold stacks in the current extraction
    async fn get_gold_count(&self) -> Result<GoldState, BackendError>;

    /// Rewrite the gold total and repack into a new `.lsv` archive
    async fn modify_and_save_gold(&self, new_gold: i32) -> Result<String, BackendError>;

    /// Verify the toolchain is present and runnable
    async fn check_lslib_status(&self) -> Result<String, BackendError>;
}

/// Directory-selection collaborator for the saves catalog
///
/// `Ok(None)` means the user cancelled; errors are logged by the catalog and
/// never surfaced as session status.
#[async_trait]
pub trait FolderPicker: Send + Sync {
    /// Ask for a directory, starting from `start_dir`
    async fn pick_folder(&self, start_dir: &str) -> anyhow::Result<Option<String>>;
}

/// Native directory dialog backed by rfd
#[cfg(feature = "dialog")]
pub struct NativeFolderPicker;

#[cfg(feature = "dialog")]
#[async_trait]
impl FolderPicker for NativeFolderPicker {
    async fn pick_folder(&self, start_dir: &str) -> anyhow::Result<Option<String>> {
        let mut dialog = rfd::AsyncFileDialog::new().set_title("Select Saves Folder");
        if std::path::Path::new(start_dir).is_dir() {
            dialog = dialog.set_directory(start_dir);
        }
        Ok(dialog
            .pick_folder()
            .await
            .map(|handle| handle.path().display().to_string()))
    }
}
