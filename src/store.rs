//! Draft and execution-history persistence
//!
//! The editor's recovery store: hook drafts and an execution history are
//! kept as JSON blobs under fixed key names in a directory. Reads degrade to
//! empty state when a blob is missing or corrupt; this store is a
//! convenience cache, not a system of record.

use crate::hooks::model::HookDefinition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fixed key for the drafts blob
pub const DRAFTS_KEY: &str = "cds-hook-drafts";
/// Fixed key for the execution-history blob
pub const HISTORY_KEY: &str = "cds-execution-history";
/// Execution history retention; oldest entries are dropped first
pub const HISTORY_CAP: usize = 50;

/// Errors from the persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Blob could not be serialized
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of one recorded hook execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionOutcome {
    /// The service returned cards
    Success,
    /// The invocation failed
    Failed {
        /// User-facing failure description
        message: String,
    },
}

/// One execution-history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Id of the executed hook
    pub hook_id: String,
    /// When the execution ran
    pub executed_at: DateTime<Utc>,
    /// Number of cards returned
    pub card_count: usize,
    /// Success or failure
    pub outcome: ExecutionOutcome,
}

/// File-backed store for drafts and history
#[derive(Debug, Clone)]
pub struct WorkbenchStore {
    root: PathBuf,
}

impl WorkbenchStore {
    /// Open a store rooted at a directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Save or replace a draft, keyed by hook id
    pub fn save_draft(&self, hook: &HookDefinition) -> Result<(), StoreError> {
        let mut drafts = self.load_drafts();
        match drafts.iter_mut().find(|d| d.id == hook.id) {
            Some(existing) => *existing = hook.clone(),
            None => drafts.push(hook.clone()),
        }
        self.write_blob(DRAFTS_KEY, &drafts)
    }

    /// All saved drafts; missing or corrupt blobs yield an empty list
    pub fn load_drafts(&self) -> Vec<HookDefinition> {
        self.read_blob(DRAFTS_KEY)
    }

    /// Remove a draft by hook id, returning whether one was removed
    pub fn delete_draft(&self, id: &str) -> Result<bool, StoreError> {
        let mut drafts = self.load_drafts();
        let before = drafts.len();
        drafts.retain(|d| d.id != id);
        let removed = drafts.len() != before;
        if removed {
            self.write_blob(DRAFTS_KEY, &drafts)?;
        }
        Ok(removed)
    }

    /// Append an execution record, dropping the oldest past the cap
    pub fn record_execution(&self, record: ExecutionRecord) -> Result<(), StoreError> {
        let mut history: Vec<ExecutionRecord> = self.read_blob(HISTORY_KEY);
        history.push(record);
        if history.len() > HISTORY_CAP {
            let excess = history.len() - HISTORY_CAP;
            history.drain(..excess);
        }
        self.write_blob(HISTORY_KEY, &history)
    }

    /// Execution history, oldest first
    pub fn history(&self) -> Vec<ExecutionRecord> {
        self.read_blob(HISTORY_KEY)
    }

    fn read_blob<T: for<'de> Deserialize<'de> + Default>(&self, key: &str) -> T {
        let path = self.blob_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(value) => value,
                Err(error) => {
                    log::warn!("corrupt blob at {}: {error}", path.display());
                    T::default()
                }
            },
            Err(_) => T::default(),
        }
    }

    fn write_blob<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let path = self.blob_path(key);
        let content = serde_json::to_string_pretty(value)?;
        write_atomically(&path, &content)?;
        Ok(())
    }
}

/// Write via a sibling temp file so a crash mid-write cannot corrupt the blob
fn write_atomically(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}
