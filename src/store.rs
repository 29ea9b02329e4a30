//! Append-only score log backed by a single JSON file
//!
//! The whole-file read-append-write cycle is the one place where concurrent
//! writers can corrupt the persisted structure, so every append and every
//! read runs under the store's mutex. Reads therefore always observe either
//! the pre-append or the post-append state of the log, never a torn one.
//!
//! Writes go through a temp file + rename so a crash mid-write cannot leave
//! a half-written log behind.

use crate::error::{BridgeError, Result};
use crate::types::ScoreEvent;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// File-backed append-only log of score events
///
/// Unbounded write, bounded read: entries are never evicted, but consumers
/// only ever read the most recent window.
pub struct ScoreStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ScoreStore {
    /// Create a store at the given path; the file is created on first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably append one event
    ///
    /// Safe to call concurrently with itself and with `read_recent`.
    pub async fn append(&self, event: ScoreEvent) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut events = self.load()?;
        events.push(event);
        self.persist(&events)?;

        tracing::debug!(
            path = %self.path.display(),
            total = events.len(),
            "Score appended"
        );
        Ok(())
    }

    /// Return at most `n` events, most recent first
    pub async fn read_recent(&self, n: usize) -> Result<Vec<ScoreEvent>> {
        let _guard = self.lock.lock().await;

        let events = self.load()?;
        Ok(events.iter().rev().take(n).cloned().collect())
    }

    /// Number of events in the log
    pub async fn len(&self) -> Result<usize> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.len())
    }

    /// Whether the log is empty
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    fn load(&self) -> Result<Vec<ScoreEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            BridgeError::Storage(format!(
                "Failed to read score log {}: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&json).map_err(|e| {
            BridgeError::Storage(format!(
                "Failed to parse score log {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn persist(&self, events: &[ScoreEvent]) -> Result<()> {
        let json = serde_json::to_string_pretty(events)?;

        // Atomic write: write to temp file, then rename
        let tmp_path = self.path.with_extension("tmp");

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BridgeError::Storage(format!(
                    "Failed to create score directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        std::fs::write(&tmp_path, json).map_err(|e| {
            BridgeError::Storage(format!(
                "Failed to write score log {}: {}",
                tmp_path.display(),
                e
            ))
        })?;

        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            BridgeError::Storage(format!(
                "Failed to rename score log {} -> {}: {}",
                tmp_path.display(),
                self.path.display(),
                e
            ))
        })
    }
}
