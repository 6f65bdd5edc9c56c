use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// An operation is in flight
    Progress,
    /// The last operation completed
    Success,
    /// The last operation failed
    Error,
}

/// The single live status of one session component
///
/// Every update overwrites the previous line; nothing is appended. Error text
/// arrives already formatted (`❌ <command>: <message>`) from the command
/// gateway and is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    /// What kind of update this is
    pub kind: StatusKind,

    /// Display text, ready to render
    pub text: String,
}

impl StatusLine {
    /// Create a progress line
    pub fn progress(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Progress,
            text: text.into(),
        }
    }

    /// Create a success line
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    /// Create an error line
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    /// Whether this line reports a failure
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl std::fmt::Display for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Monotonic counter shared by every status channel of one session
///
/// Each write takes the next stamp, so the session can compose channels with
/// last-write-wins semantics without a shared event log.
#[derive(Debug, Clone, Default)]
pub struct StatusClock {
    next: Arc<AtomicU64>,
}

impl StatusClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new channel stamped by this clock
    pub fn channel(&self) -> StatusChannel {
        StatusChannel {
            clock: self.clone(),
            slot: Arc::new(Mutex::new(None)),
        }
    }

    fn tick(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// A component-owned status slot
///
/// Clones share the same slot, so a reader handed out before an operation
/// observes updates made during it. Exactly one component writes to a given
/// channel; no component clears another's.
#[derive(Debug, Clone)]
pub struct StatusChannel {
    clock: StatusClock,
    slot: Arc<Mutex<Option<(u64, StatusLine)>>>,
}

impl StatusChannel {
    /// Overwrite the current line
    pub fn set(&self, line: StatusLine) {
        let stamp = self.clock.tick();
        *self.slot.lock().expect("status slot poisoned") = Some((stamp, line));
    }

    /// Overwrite with a progress line
    pub fn set_progress(&self, text: impl Into<String>) {
        self.set(StatusLine::progress(text));
    }

    /// Overwrite with a success line
    pub fn set_success(&self, text: impl Into<String>) {
        self.set(StatusLine::success(text));
    }

    /// Overwrite with an error line
    pub fn set_error(&self, text: impl Into<String>) {
        self.set(StatusLine::error(text));
    }

    /// Clear the slot back to empty
    pub fn clear(&self) {
        *self.slot.lock().expect("status slot poisoned") = None;
    }

    /// The current line, if any
    pub fn current(&self) -> Option<StatusLine> {
        self.slot
            .lock()
            .expect("status slot poisoned")
            .as_ref()
            .map(|(_, line)| line.clone())
    }

    /// The current line with its write stamp, for cross-channel composition
    pub(crate) fn last_update(&self) -> Option<(u64, StatusLine)> {
        self.slot.lock().expect("status slot poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_previous_line() {
        let channel = StatusClock::new().channel();
        channel.set_progress("Saving changes...");
        channel.set_success("✅ Saved");

        let line = channel.current().unwrap();
        assert_eq!(line.kind, StatusKind::Success);
        assert_eq!(line.text, "✅ Saved");
    }

    #[test]
    fn clear_empties_the_slot() {
        let channel = StatusClock::new().channel();
        channel.set_error("❌ extract_save: boom");
        channel.clear();
        assert!(channel.current().is_none());
    }

    #[test]
    fn clones_share_the_slot() {
        let channel = StatusClock::new().channel();
        let reader = channel.clone();
        channel.set_progress("working");
        assert_eq!(reader.current().unwrap().text, "working");
    }

    #[test]
    fn stamps_order_writes_across_channels() {
        let clock = StatusClock::new();
        let first = clock.channel();
        let second = clock.channel();

        first.set_success("older");
        second.set_success("newer");

        let (a, _) = first.last_update().unwrap();
        let (b, _) = second.last_update().unwrap();
        assert!(b > a);
    }

    #[test]
    fn error_lines_report_as_errors() {
        assert!(StatusLine::error("❌ nope").is_error());
        assert!(!StatusLine::success("fine").is_error());
    }
}
