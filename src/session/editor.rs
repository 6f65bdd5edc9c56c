//! Gold editing: load, draft, commit and reload-after-commit.

use std::future::Future;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::domain::{EditableField, ExtractedSave, GoldItem, StatusChannel, StatusLine};
use crate::gateway::{CommandError, CommandGateway};

static NEW_SAVE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"New save: (.+\.lsv)").unwrap());

/// Pull the new archive path out of a commit result
///
/// First match or none. A result without the marker is still a valid commit;
/// it just means there is nothing to reload.
pub fn parse_new_save_path(result: &str) -> Option<&str> {
    NEW_SAVE_PATTERN
        .captures(result)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// What a commit call actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Preconditions unmet; nothing was sent to the backend
    Skipped,
    /// The backend write failed; the failure is recorded in the status line
    Failed,
    /// The write succeeded; the result carried no new-save marker
    Saved,
    /// The write succeeded and the new save was reloaded
    SavedAndReloaded,
}

impl CommitOutcome {
    /// Whether the backend write landed
    pub fn is_saved(&self) -> bool {
        matches!(self, CommitOutcome::Saved | CommitOutcome::SavedAndReloaded)
    }
}

/// Lifecycle of the editable gold field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorState {
    /// Nothing loaded from the current extraction
    Unloaded,
    /// Loaded; draft equals the committed value
    Clean,
    /// Draft may diverge from the committed value
    Editing,
    /// A commit is in flight
    Saving,
}

impl EditorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorState::Unloaded => "unloaded",
            EditorState::Clean => "clean",
            EditorState::Editing => "editing",
            EditorState::Saving => "saving",
        }
    }
}

impl std::fmt::Display for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The gold amount of the extracted save, editable and committable
///
/// Unmet preconditions (committing with nothing loaded, editing before a
/// load) are silent no-ops with a log line; only backend reload failures
/// after a successful commit surface as errors from here.
pub struct GoldEditor {
    gateway: CommandGateway,
    status: StatusChannel,
    field: Option<EditableField<i32>>,
    items: Vec<GoldItem>,
    saving: bool,
}

impl GoldEditor {
    pub(crate) fn new(gateway: CommandGateway, status: StatusChannel) -> Self {
        Self {
            gateway,
            status,
            field: None,
            items: Vec::new(),
            saving: false,
        }
    }

    pub fn state(&self) -> EditorState {
        if self.saving {
            return EditorState::Saving;
        }
        match &self.field {
            None => EditorState::Unloaded,
            Some(field) if field.is_editing() => EditorState::Editing,
            Some(_) => EditorState::Clean,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.field.is_some()
    }

    pub fn is_editing(&self) -> bool {
        self.field.as_ref().is_some_and(|field| field.is_editing())
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Whether the draft has diverged from the committed value
    pub fn has_changes(&self) -> bool {
        self.field.as_ref().is_some_and(|field| field.is_dirty())
    }

    /// The last backend-confirmed total
    pub fn committed(&self) -> Option<i32> {
        self.field.as_ref().map(|field| *field.committed())
    }

    /// The draft total
    pub fn draft(&self) -> Option<i32> {
        self.field.as_ref().map(|field| *field.draft())
    }

    /// Stack breakdown from the last load
    pub fn items(&self) -> &[GoldItem] {
        &self.items
    }

    pub fn status(&self) -> Option<StatusLine> {
        self.status.current()
    }

    /// Load the gold total from the current extraction
    ///
    /// On failure the editor logs and keeps whatever it had; a fresh editor
    /// stays Unloaded.
    pub async fn load(&mut self, _extracted: &ExtractedSave) {
        if self.saving {
            warn!("ignoring gold load while a commit is in flight");
            return;
        }

        match self.gateway.get_gold_count().await {
            Ok(gold) => {
                self.field = Some(EditableField::new(gold.total_gold));
                self.items = gold.items;
            }
            Err(err) => {
                warn!(error = %err, "gold load failed");
            }
        }
    }

    /// Open an edit window seeded from the committed value
    pub fn begin_edit(&mut self) {
        if self.saving {
            warn!("ignoring begin_edit while a commit is in flight");
            return;
        }
        match &mut self.field {
            Some(field) => field.begin_edit(),
            None => debug!("begin_edit ignored, no gold loaded"),
        }
    }

    /// Replace the draft; ignored outside an edit
    pub fn set_draft(&mut self, amount: i32) {
        if let Some(field) = &mut self.field {
            field.set_draft(amount);
        }
    }

    /// Discard the draft and clear any transient status text
    pub fn cancel_edit(&mut self) {
        if self.saving {
            warn!("ignoring cancel_edit while a commit is in flight");
            return;
        }
        if let Some(field) = &mut self.field {
            field.cancel_edit();
            self.status.clear();
        }
    }

    /// Commit the draft to a new save archive
    ///
    /// Runs the backend write, applies the commit locally, then parses the
    /// result for a `New save:` marker. When one is present, `on_reload` is
    /// invoked exactly once with the new path; its failure is the only error
    /// this method returns, and by then the editor is already Clean. A
    /// backend write failure is absorbed into the status line and the editor
    /// returns to Editing with the draft intact.
    pub async fn commit<F, Fut>(
        &mut self,
        _extracted: &ExtractedSave,
        on_reload: F,
    ) -> Result<CommitOutcome, CommandError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<(), CommandError>>,
    {
        if self.saving {
            warn!("ignoring commit while another is in flight");
            return Ok(CommitOutcome::Skipped);
        }
        let Some(draft) = self
            .field
            .as_ref()
            .filter(|field| field.is_editing())
            .map(|field| *field.draft())
        else {
            debug!("commit ignored, nothing is being edited");
            return Ok(CommitOutcome::Skipped);
        };

        self.saving = true;
        self.status.set_progress("Saving changes...");

        match self.gateway.modify_and_save_gold(draft).await {
            Ok(result) => {
                if let Some(field) = &mut self.field {
                    field.apply_commit();
                }
                self.saving = false;

                if let Some(new_path) = parse_new_save_path(&result).map(str::to_string) {
                    self.status
                        .set_success("✅ Changes saved! Reloading modified save...");
                    on_reload(new_path).await?;
                    self.status.set_success(format!(
                        "✅ {}\n\n✓ Modified save loaded successfully!",
                        result
                    ));
                    Ok(CommitOutcome::SavedAndReloaded)
                } else {
                    self.status.set_success(format!("✅ {}", result));
                    Ok(CommitOutcome::Saved)
                }
            }
            Err(err) => {
                self.saving = false;
                self.status.set_error(err.to_string());
                Ok(CommitOutcome::Failed)
            }
        }
    }

    /// Back to Unloaded, dropping field, breakdown and status
    pub fn reset(&mut self) {
        self.field = None;
        self.items.clear();
        self.saving = false;
        self.status.clear();
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod tests;
