//! Drives the backend's save extraction and metadata reads.

use tracing::warn;

use crate::domain::{ExtractedSave, SaveMetadata, StatusChannel, StatusLine};
use crate::gateway::{CommandError, CommandGateway};

/// Controls the lifecycle of the backend-side extraction
///
/// A successful `extract` issues an [`ExtractedSave`] token; editor
/// operations require a reference to it, which keeps them impossible to call
/// before anything is extracted.
pub struct ExtractionController {
    gateway: CommandGateway,
    status: StatusChannel,
    metadata: Option<SaveMetadata>,
    extracted: Option<ExtractedSave>,
}

impl ExtractionController {
    pub(crate) fn new(gateway: CommandGateway, status: StatusChannel) -> Self {
        Self {
            gateway,
            status,
            metadata: None,
            extracted: None,
        }
    }

    /// Token for the current extraction, if one succeeded
    pub fn extracted(&self) -> Option<&ExtractedSave> {
        self.extracted.as_ref()
    }

    /// Metadata fetched for the current extraction
    pub fn metadata(&self) -> Option<&SaveMetadata> {
        self.metadata.as_ref()
    }

    pub fn status(&self) -> Option<StatusLine> {
        self.status.current()
    }

    /// Unpack the archive at `save_path` into the backend's working area
    ///
    /// The backend's result message is the unit of record: it is stored as
    /// the success status and returned verbatim. Failures are recorded and
    /// propagated unchanged so the caller can surface them its own way. A
    /// failed extraction also drops any previous token, since the backend
    /// rebuilds its working area before unpacking.
    pub async fn extract(&mut self, save_path: &str) -> Result<String, CommandError> {
        self.status.set_progress("Extracting save...");

        match self.gateway.extract_save(save_path).await {
            Ok(message) => {
                self.extracted = Some(ExtractedSave::new(save_path));
                self.status.set_success(message.clone());
                Ok(message)
            }
            Err(err) => {
                self.extracted = None;
                self.status.set_error(err.to_string());
                Err(err)
            }
        }
    }

    /// Fetch `SaveInfo.json` for the current extraction
    ///
    /// On failure the previous metadata stays in place; stale-but-present
    /// reads better than a blank panel.
    pub async fn read_metadata(&mut self) {
        match self.gateway.read_save_info().await {
            Ok(metadata) => self.metadata = Some(metadata),
            Err(err) => {
                warn!(error = %err, "save metadata read failed");
            }
        }
    }

    /// Drop the token, metadata and status
    ///
    /// Purely session-side: the backend's working area is left as is.
    pub fn reset(&mut self) {
        self.metadata = None;
        self.extracted = None;
        self.status.clear();
    }
}
