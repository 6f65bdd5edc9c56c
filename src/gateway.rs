//! Typed call boundary between the session and the save backend.
//!
//! Every backend command goes through [`CommandGateway`], which turns any
//! failure into a [`CommandError`] rendered as `❌ <command>: <message>`.
//! That prefix is applied here and nowhere else; session components store the
//! rendered text verbatim, so error copy stays consistent no matter which
//! component surfaced it.

use std::future::Future;
use std::sync::Arc;

use tracing::error;

use crate::backend::{BackendError, SaveBackend};
use crate::domain::{GoldState, SaveEntry, SaveMetadata};

/// A backend command failure, formatted for display
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("❌ {command}: {message}")]
pub struct CommandError {
    /// The backend command that failed
    pub command: &'static str,

    /// The backend's message, unprefixed
    pub message: String,
}

/// Uniform async front door to a [`SaveBackend`]
#[derive(Clone)]
pub struct CommandGateway {
    backend: Arc<dyn SaveBackend>,
}

impl CommandGateway {
    pub fn new(backend: Arc<dyn SaveBackend>) -> Self {
        Self { backend }
    }

    pub async fn list_saves(&self, folder_path: &str) -> Result<Vec<SaveEntry>, CommandError> {
        self.call("list_saves", self.backend.list_saves(folder_path))
            .await
    }

    pub async fn read_save_info(&self) -> Result<SaveMetadata, CommandError> {
        self.call("read_save_info", self.backend.read_save_info())
            .await
    }

    pub async fn extract_save(&self, save_path: &str) -> Result<String, CommandError> {
        self.call("extract_save", self.backend.extract_save(save_path))
            .await
    }

    pub async fn get_gold_count(&self) -> Result<GoldState, CommandError> {
        self.call("get_gold_count", self.backend.get_gold_count())
            .await
    }

    pub async fn modify_and_save_gold(&self, new_gold: i32) -> Result<String, CommandError> {
        self.call(
            "modify_and_save_gold",
            self.backend.modify_and_save_gold(new_gold),
        )
        .await
    }

    pub async fn check_lslib_status(&self) -> Result<String, CommandError> {
        self.call("check_lslib_status", self.backend.check_lslib_status())
            .await
    }

    /// Await one backend call, normalizing its failure
    async fn call<T>(
        &self,
        command: &'static str,
        call: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, CommandError> {
        match call.await {
            Ok(value) => Ok(value),
            Err(err) => {
                error!(command, error = %err, "backend command failed");
                Err(CommandError {
                    command,
                    message: err.to_string(),
                })
            }
        }
    }
}
