//! Shared test utilities: a scripted in-memory save backend

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use lsvedit::backend::{BackendError, SaveBackend};
use lsvedit::domain::{GoldItem, GoldState, SaveEntry, SaveMetadata};

/// One backend invocation, recorded in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListSaves(String),
    ReadSaveInfo,
    ExtractSave(String),
    GetGoldCount,
    ModifyAndSaveGold(i32),
    CheckLslibStatus,
}

/// Backend that replays scripted responses and records every call
///
/// Each operation pops the next scripted response; running out of responses
/// fails the test, so scripts double as call-count assertions.
#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<Call>>,
    lists: Mutex<VecDeque<Result<Vec<SaveEntry>, String>>>,
    infos: Mutex<VecDeque<Result<SaveMetadata, String>>>,
    extracts: Mutex<VecDeque<Result<String, String>>>,
    golds: Mutex<VecDeque<Result<GoldState, String>>>,
    modifies: Mutex<VecDeque<Result<String, String>>>,
    checks: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, entries: Vec<SaveEntry>) -> Self {
        self.lists.lock().unwrap().push_back(Ok(entries));
        self
    }

    pub fn with_list_failure(self, message: &str) -> Self {
        self.lists.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn with_info(self, value: serde_json::Value) -> Self {
        self.infos
            .lock()
            .unwrap()
            .push_back(Ok(SaveMetadata::new(value)));
        self
    }

    pub fn with_extract(self, message: &str) -> Self {
        self.extracts.lock().unwrap().push_back(Ok(message.to_string()));
        self
    }

    pub fn with_extract_failure(self, message: &str) -> Self {
        self.extracts
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn with_gold(self, total_gold: i32) -> Self {
        self.golds.lock().unwrap().push_back(Ok(GoldState {
            total_gold,
            items: vec![GoldItem {
                name: "Gold".to_string(),
                amount: total_gold,
            }],
        }));
        self
    }

    pub fn with_modify(self, message: &str) -> Self {
        self.modifies.lock().unwrap().push_back(Ok(message.to_string()));
        self
    }

    pub fn with_modify_failure(self, message: &str) -> Self {
        self.modifies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn with_check(self, message: &str) -> Self {
        self.checks.lock().unwrap().push_back(Ok(message.to_string()));
        self
    }

    pub fn with_check_failure(self, message: &str) -> Self {
        self.checks
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Everything the session invoked, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SaveBackend for ScriptedBackend {
    async fn list_saves(&self, folder_path: &str) -> Result<Vec<SaveEntry>, BackendError> {
        self.record(Call::ListSaves(folder_path.to_string()));
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected list_saves call")
            .map_err(BackendError::Toolchain)
    }

    async fn read_save_info(&self) -> Result<SaveMetadata, BackendError> {
        self.record(Call::ReadSaveInfo);
        self.infos
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected read_save_info call")
            .map_err(BackendError::MissingArtifact)
    }

    async fn extract_save(&self, save_path: &str) -> Result<String, BackendError> {
        self.record(Call::ExtractSave(save_path.to_string()));
        self.extracts
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected extract_save call")
            .map_err(BackendError::Toolchain)
    }

    async fn get_gold_count(&self) -> Result<GoldState, BackendError> {
        self.record(Call::GetGoldCount);
        self.golds
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected get_gold_count call")
            .map_err(BackendError::MissingArtifact)
    }

    async fn modify_and_save_gold(&self, new_gold: i32) -> Result<String, BackendError> {
        self.record(Call::ModifyAndSaveGold(new_gold));
        self.modifies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected modify_and_save_gold call")
            .map_err(BackendError::Toolchain)
    }

    async fn check_lslib_status(&self) -> Result<String, BackendError> {
        self.record(Call::CheckLslibStatus);
        self.checks
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected check_lslib_status call")
            .map_err(BackendError::Toolchain)
    }
}

/// A catalog entry with a fixed timestamp
pub fn save_entry(name: &str, path: &str) -> SaveEntry {
    SaveEntry {
        name: name.to_string(),
        path: path.to_string(),
        modified: "2026-08-01 10:30:00".to_string(),
    }
}
