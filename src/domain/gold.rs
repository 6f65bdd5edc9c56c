use serde::{Deserialize, Serialize};

/// One gold stack found in the extracted save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldItem {
    /// Stat name of the stack (e.g. `LOOT_Gold_A`)
    pub name: String,

    /// Coins in this stack
    pub amount: i32,
}

/// The backend's answer to a gold query
///
/// `total_gold` seeds the editable field; `items` is the read-only breakdown
/// shown alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldState {
    /// Sum across all stacks
    pub total_gold: i32,

    /// Individual stacks, in file order
    pub items: Vec<GoldItem>,
}

/// A field mirrored from the extracted save, editable in place
///
/// Holds the last value confirmed by the backend next to the user's draft.
/// Outside an edit the two are identical; `begin_edit` opens a divergence
/// window and `cancel_edit`/`apply_commit` close it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableField<T> {
    committed: T,
    draft: T,
    editing: bool,
}

impl<T: Clone + PartialEq> EditableField<T> {
    /// Wrap a freshly loaded value (clean, not editing)
    pub fn new(value: T) -> Self {
        Self {
            committed: value.clone(),
            draft: value,
            editing: false,
        }
    }

    /// The last backend-confirmed value
    pub fn committed(&self) -> &T {
        &self.committed
    }

    /// The current draft (equals committed outside an edit)
    pub fn draft(&self) -> &T {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Whether the draft has diverged from the committed value
    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    /// Open an edit: draft starts from the committed value
    pub fn begin_edit(&mut self) {
        self.draft = self.committed.clone();
        self.editing = true;
    }

    /// Abandon the draft and leave editing
    pub fn cancel_edit(&mut self) {
        self.draft = self.committed.clone();
        self.editing = false;
    }

    /// Replace the draft; ignored outside an edit
    pub fn set_draft(&mut self, value: T) {
        if self.editing {
            self.draft = value;
        }
    }

    /// Accept the draft as the new committed value and leave editing
    pub fn apply_commit(&mut self) {
        self.committed = self.draft.clone();
        self.editing = false;
    }
}
