//! Wire payloads and persistent records for the bridge
//!
//! All wire types use camelCase JSON serialization for compatibility with
//! the device firmware.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Outbound pairing command published to the pairing subject
///
/// Carries the network the device should join plus the identity of the
/// user requesting the pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingCommand {
    /// Identifier of the device/network being paired
    pub device_id: String,

    /// Network credential; empty for an open network
    #[serde(default)]
    pub credential_secret: String,

    /// Identity of the caller requesting the pairing
    pub requester_identity: String,
}

/// Inbound acknowledgment received on the pairing-ack subject
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingAck {
    /// Device identifier the ack refers to
    pub device_id: String,

    /// "paired" on success; any other value is a device-reported failure
    pub status: String,

    /// Requester identity echoed back by the device
    #[serde(default)]
    pub requester_identity: String,
}

impl PairingAck {
    /// Whether the device reported a successful pairing
    pub fn is_paired(&self) -> bool {
        self.status == "paired"
    }
}

/// Terminal outcome of a pairing request
///
/// Produced exactly once per request and immutable afterwards. A reported
/// failure is a delivered result, distinct from no response at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingOutcome {
    /// The device confirmed the pairing
    Paired { device_id: String },

    /// The device answered with a non-success status
    Failed { device_id: String, status: String },

    /// No matching acknowledgment arrived within the deadline
    TimedOut,
}

/// Inbound telemetry payload received on the scores subject
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    /// Reporting device identifier
    pub device_id: String,

    /// Player the score belongs to
    pub player_name: String,

    /// Final score of the finished game
    pub score_value: i64,
}

/// A persisted score entry
///
/// Append-only: once written it is never mutated or deleted. `recorded_at`
/// is assigned by the ingester at receipt time; device clocks are not
/// trusted. Insertion order equals arrival order at the ingester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEvent {
    /// Reporting device identifier
    pub device_id: String,

    /// Player the score belongs to
    pub player_name: String,

    /// Final score of the finished game
    pub score_value: i64,

    /// Unix timestamp in seconds, assigned at ingestion
    pub recorded_at: i64,

    /// Human-readable timestamp for display consumers
    pub date: String,
}

impl ScoreEvent {
    /// Build a persisted entry from a wire report, stamping the current time
    pub fn record(report: ScoreReport) -> Self {
        let now = Local::now();
        Self {
            device_id: report.device_id,
            player_name: report.player_name,
            score_value: report.score_value,
            recorded_at: now.timestamp(),
            date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
