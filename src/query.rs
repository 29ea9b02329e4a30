//! Scoreboard query facade for display consumers
//!
//! Thin read-only view over the score log. Storage faults never reach the
//! presentation layer; a failed read serves an empty board.

use crate::store::ScoreStore;
use crate::types::ScoreEvent;
use std::sync::Arc;

/// Read-only view of recent scores
pub struct Scoreboard {
    store: Arc<ScoreStore>,
}

impl Scoreboard {
    /// Create a scoreboard over `store`
    pub fn new(store: Arc<ScoreStore>) -> Self {
        Self { store }
    }

    /// List at most `limit` scores, most recent first
    pub async fn list_recent(&self, limit: usize) -> Vec<ScoreEvent> {
        match self.store.read_recent(limit).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read scores, serving empty board");
                Vec::new()
            }
        }
    }
}
