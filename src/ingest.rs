//! Telemetry ingestion: score reports into the score log
//!
//! Every inbound message on the scores subject passes through here once.
//! The ingestion path never raises: malformed payloads and storage faults
//! are logged and the message is dropped, so telemetry failures cannot
//! affect pairing or the transport delivery loop.

use crate::store::ScoreStore;
use crate::types::{ScoreEvent, ScoreReport};
use std::sync::Arc;

/// Consumes score reports and appends them to the store
pub struct ScoreIngester {
    store: Arc<ScoreStore>,
}

impl ScoreIngester {
    /// Create an ingester writing to `store`
    pub fn new(store: Arc<ScoreStore>) -> Self {
        Self { store }
    }

    /// Handle one inbound telemetry payload
    ///
    /// Stamps the ingestion-time clock on the event; timestamps from the
    /// device are not trusted.
    pub async fn handle_report(&self, payload: &[u8]) {
        let report: ScoreReport = match serde_json::from_slice(payload) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed score report");
                return;
            }
        };

        let event = ScoreEvent::record(report);

        if let Err(e) = self.store.append(event).await {
            tracing::warn!(error = %e, "Failed to append score, report dropped");
        }
    }
}
