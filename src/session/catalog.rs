//! Saves folder catalog: listing, selection and the browse dialog.

use tracing::{debug, warn};

use crate::backend::FolderPicker;
use crate::domain::{SaveEntry, StatusChannel, StatusLine};
use crate::gateway::CommandGateway;

/// The catalog of save archives under the configured folder
///
/// Entries are replaced wholesale on every successful listing; a failed
/// listing leaves the previous entries and selection in place.
pub struct SaveCatalog {
    gateway: CommandGateway,
    status: StatusChannel,
    folder: String,
    entries: Vec<SaveEntry>,
    selected: Option<String>,
    loading: bool,
}

impl SaveCatalog {
    pub(crate) fn new(
        gateway: CommandGateway,
        status: StatusChannel,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            status,
            folder: folder.into(),
            entries: Vec::new(),
            selected: None,
            loading: false,
        }
    }

    /// The folder the next listing will scan
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Point the catalog at a different folder without scanning it
    pub fn set_folder(&mut self, folder: impl Into<String>) {
        self.folder = folder.into();
    }

    /// Entries from the last successful listing
    pub fn entries(&self) -> &[SaveEntry] {
        &self.entries
    }

    /// Path of the currently selected save, if any
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a save by path; rejects paths not in the current entries
    pub fn select(&mut self, path: &str) -> bool {
        if self.entries.iter().any(|entry| entry.path == path) {
            self.selected = Some(path.to_string());
            true
        } else {
            debug!(path, "ignoring selection of unlisted save");
            false
        }
    }

    pub fn has_saves(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> Option<StatusLine> {
        self.status.current()
    }

    /// Scan the folder and replace the entries
    ///
    /// A non-empty listing auto-selects the most recent save; an empty one
    /// clears the selection, since no prior selection can still be valid.
    pub async fn list_saves(&mut self) {
        self.loading = true;

        match self.gateway.list_saves(&self.folder).await {
            Ok(entries) => {
                self.entries = entries;
                if self.entries.is_empty() {
                    self.selected = None;
                    self.status.set_success("No saves found in folder");
                } else {
                    self.selected = Some(self.entries[0].path.clone());
                    self.status
                        .set_success(format!("Found {} save(s)", self.entries.len()));
                }
            }
            Err(err) => {
                self.status.set_error(err.to_string());
            }
        }

        self.loading = false;
    }

    /// Ask the picker for a folder, then scan it
    ///
    /// Cancellation and dialog failures leave the catalog untouched; a dialog
    /// failure is logged but never written into the status channel.
    pub async fn browse_folder(&mut self, picker: &dyn FolderPicker) -> bool {
        match picker.pick_folder(&self.folder).await {
            Ok(Some(folder)) => {
                self.folder = folder;
                self.list_saves().await;
                true
            }
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "folder dialog failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, SaveBackend};
    use crate::domain::{GoldState, SaveMetadata, StatusClock, StatusKind};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Backend that replays scripted `list_saves` responses
    struct ScriptedLists {
        responses: Mutex<VecDeque<Result<Vec<SaveEntry>, String>>>,
    }

    impl ScriptedLists {
        fn new(responses: Vec<Result<Vec<SaveEntry>, String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
            })
        }
    }

    #[async_trait]
    impl SaveBackend for ScriptedLists {
        async fn list_saves(&self, _folder_path: &str) -> Result<Vec<SaveEntry>, BackendError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected list_saves call")
                .map_err(BackendError::Toolchain)
        }
        async fn read_save_info(&self) -> Result<SaveMetadata, BackendError> {
            unimplemented!()
        }
        async fn extract_save(&self, _save_path: &str) -> Result<String, BackendError> {
            unimplemented!()
        }
        async fn get_gold_count(&self) -> Result<GoldState, BackendError> {
            unimplemented!()
        }
        async fn modify_and_save_gold(&self, _new_gold: i32) -> Result<String, BackendError> {
            unimplemented!()
        }
        async fn check_lslib_status(&self) -> Result<String, BackendError> {
            unimplemented!()
        }
    }

    fn entry(name: &str) -> SaveEntry {
        SaveEntry {
            name: name.to_string(),
            path: format!("C:\\saves\\story\\{name}\\{name}.lsv"),
            modified: "2026-08-01 10:30:00".to_string(),
        }
    }

    fn catalog(backend: Arc<dyn SaveBackend>) -> SaveCatalog {
        SaveCatalog::new(
            CommandGateway::new(backend),
            StatusClock::new().channel(),
            "C:\\saves\\story",
        )
    }

    #[tokio::test]
    async fn listing_selects_the_most_recent_save() {
        let backend = ScriptedLists::new(vec![Ok(vec![entry("slot2"), entry("slot1")])]);
        let mut catalog = catalog(backend);

        catalog.list_saves().await;

        assert_eq!(catalog.entries().len(), 2);
        assert_eq!(catalog.selected(), Some(catalog.entries()[0].path.as_str()));
        assert_eq!(catalog.status().unwrap().text, "Found 2 save(s)");
        assert!(catalog.has_saves());
        assert!(!catalog.is_loading());
    }

    #[tokio::test]
    async fn empty_listing_clears_the_selection() {
        let backend = ScriptedLists::new(vec![Ok(vec![entry("slot1")]), Ok(vec![])]);
        let mut catalog = catalog(backend);

        catalog.list_saves().await;
        assert!(catalog.selected().is_some());

        catalog.list_saves().await;
        assert!(catalog.selected().is_none());
        assert!(catalog.entries().is_empty());
        assert_eq!(catalog.status().unwrap().text, "No saves found in folder");
    }

    #[tokio::test]
    async fn failed_listing_preserves_previous_entries() {
        let backend = ScriptedLists::new(vec![
            Ok(vec![entry("slot1")]),
            Err("permission denied".to_string()),
        ]);
        let mut catalog = catalog(backend);

        catalog.list_saves().await;
        let selected_before = catalog.selected().map(str::to_string);

        catalog.list_saves().await;

        assert_eq!(catalog.entries().len(), 1);
        assert_eq!(catalog.selected().map(str::to_string), selected_before);
        let status = catalog.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "❌ list_saves: permission denied");
    }

    #[tokio::test]
    async fn select_rejects_unlisted_paths() {
        let backend = ScriptedLists::new(vec![Ok(vec![entry("slot1"), entry("slot2")])]);
        let mut catalog = catalog(backend);
        catalog.list_saves().await;

        let slot2 = catalog.entries()[1].path.clone();
        assert!(catalog.select(&slot2));
        assert_eq!(catalog.selected(), Some(slot2.as_str()));

        assert!(!catalog.select("C:\\elsewhere\\other.lsv"));
        assert_eq!(catalog.selected(), Some(slot2.as_str()));
    }

    #[tokio::test]
    async fn set_folder_does_not_scan() {
        let backend = ScriptedLists::new(vec![]);
        let mut catalog = catalog(backend);

        catalog.set_folder("D:\\other");
        assert_eq!(catalog.folder(), "D:\\other");
        assert!(catalog.status().is_none());
    }

    struct StubPicker(Option<String>);

    #[async_trait]
    impl FolderPicker for StubPicker {
        async fn pick_folder(&self, _start_dir: &str) -> anyhow::Result<Option<String>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenPicker;

    #[async_trait]
    impl FolderPicker for BrokenPicker {
        async fn pick_folder(&self, _start_dir: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow::anyhow!("dialog crashed"))
        }
    }

    #[tokio::test]
    async fn browse_scans_the_picked_folder() {
        let backend = ScriptedLists::new(vec![Ok(vec![entry("slot1")])]);
        let mut catalog = catalog(backend);

        let picked = StubPicker(Some("D:\\moved\\saves".to_string()));
        assert!(catalog.browse_folder(&picked).await);

        assert_eq!(catalog.folder(), "D:\\moved\\saves");
        assert_eq!(catalog.status().unwrap().text, "Found 1 save(s)");
    }

    #[tokio::test]
    async fn browse_cancellation_changes_nothing() {
        let backend = ScriptedLists::new(vec![]);
        let mut catalog = catalog(backend);

        assert!(!catalog.browse_folder(&StubPicker(None)).await);
        assert_eq!(catalog.folder(), "C:\\saves\\story");
        assert!(catalog.status().is_none());
    }

    #[tokio::test]
    async fn browse_failure_is_not_surfaced() {
        let backend = ScriptedLists::new(vec![]);
        let mut catalog = catalog(backend);

        assert!(!catalog.browse_folder(&BrokenPicker).await);
        assert_eq!(catalog.folder(), "C:\\saves\\story");
        assert!(catalog.status().is_none());
    }
}
