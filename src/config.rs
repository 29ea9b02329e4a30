//! Bridge configuration
//!
//! Covers the transport address, the subject names derived from a common
//! prefix, the score log location, the pairing deadline, and the size of
//! the recent-scores window served to dashboards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the pairing and telemetry bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// Transport server URL
    pub url: String,

    /// Subject prefix; subjects are `<prefix>.pair`, `<prefix>.pair.ack`,
    /// `<prefix>.scores`
    pub subject_prefix: String,

    /// Path of the JSON score log
    pub scores_path: PathBuf,

    /// How long a pairing call waits for an acknowledgment, in seconds
    pub pairing_timeout_secs: u64,

    /// Maximum number of recent scores served to display consumers
    pub recent_window: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: "nats://127.0.0.1:4222".to_string(),
            subject_prefix: "simon".to_string(),
            scores_path: PathBuf::from("./json/scores.json"),
            pairing_timeout_secs: 10,
            recent_window: 200,
        }
    }
}

impl BridgeConfig {
    /// Subject the pairing command is published on
    pub fn pair_subject(&self) -> String {
        format!("{}.pair", self.subject_prefix)
    }

    /// Subject pairing acknowledgments arrive on
    pub fn ack_subject(&self) -> String {
        format!("{}.pair.ack", self.subject_prefix)
    }

    /// Subject score reports arrive on
    pub fn scores_subject(&self) -> String {
        format!("{}.scores", self.subject_prefix)
    }

    /// Pairing deadline as a `Duration`
    pub fn pairing_timeout(&self) -> Duration {
        Duration::from_secs(self.pairing_timeout_secs)
    }
}
