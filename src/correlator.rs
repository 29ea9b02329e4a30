//! Synchronous pairing over an asynchronous transport
//!
//! A pairing call publishes a command and blocks until a correlated
//! acknowledgment arrives on the ack subject, or the deadline expires.
//! The protocol is single-slot: at most one pairing request is in flight,
//! and a second concurrent call is rejected with `Busy` rather than
//! silently replacing the pending one.
//!
//! The pending marker and its one-shot reply channel live behind one mutex.
//! The ack handler and the timeout path both take the slot under that
//! mutex, so the release happens exactly once and a late ack can never
//! match against a future request.

use crate::error::{BridgeError, Result};
use crate::transport::Transport;
use crate::types::{PairingAck, PairingCommand, PairingOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};

/// An outstanding pairing request awaiting its acknowledgment
struct PendingPairing {
    device_id: String,
    requester_identity: String,
    reply: oneshot::Sender<PairingOutcome>,
}

/// Correlates pairing commands with their acknowledgments
pub struct PairingCorrelator {
    transport: Arc<dyn Transport>,
    pair_subject: String,
    timeout: Duration,
    pending: Mutex<Option<PendingPairing>>,
}

impl PairingCorrelator {
    /// Create a correlator publishing on `pair_subject`
    pub fn new(transport: Arc<dyn Transport>, pair_subject: String, timeout: Duration) -> Self {
        Self {
            transport,
            pair_subject,
            timeout,
            pending: Mutex::new(None),
        }
    }

    /// Publish a pairing command and wait for the correlated acknowledgment
    ///
    /// Returns the terminal outcome: `Paired`, `Failed` (the device answered
    /// with a non-success status), or `TimedOut`. Fails fast with
    /// `TransportUnavailable` when the transport has no live connection and
    /// with `Busy` when another request is already in flight.
    pub async fn request_pairing(
        &self,
        device_id: &str,
        credential_secret: &str,
        requester_identity: &str,
    ) -> Result<PairingOutcome> {
        if !self.transport.is_connected() {
            return Err(BridgeError::TransportUnavailable(format!(
                "{} transport has no live connection",
                self.transport.name()
            )));
        }

        let (tx, mut rx) = oneshot::channel();

        {
            let mut pending = self.pending.lock().await;
            if let Some(current) = pending.as_ref() {
                return Err(BridgeError::Busy(current.device_id.clone()));
            }
            *pending = Some(PendingPairing {
                device_id: device_id.to_string(),
                requester_identity: requester_identity.to_string(),
                reply: tx,
            });
        }

        let command = PairingCommand {
            device_id: device_id.to_string(),
            credential_secret: credential_secret.to_string(),
            requester_identity: requester_identity.to_string(),
        };
        let payload = serde_json::to_vec(&command)?;

        if let Err(e) = self
            .transport
            .publish(&self.pair_subject, payload.into())
            .await
        {
            // Nothing went out; leave no pending state behind.
            self.pending.lock().await.take();
            return Err(e);
        }

        tracing::info!(
            device = %device_id,
            requester = %requester_identity,
            "Pairing command published, waiting for ack"
        );

        match tokio::time::timeout(self.timeout, &mut rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => {
                // Reply channel dropped without a send; clear the slot if it
                // is still ours and report no response.
                self.pending.lock().await.take();
                Ok(PairingOutcome::TimedOut)
            }
            Err(_elapsed) => {
                let cleared = self.pending.lock().await.take();
                if cleared.is_none() {
                    // The ack handler won the race: the slot is already
                    // empty and the result is sitting in the channel.
                    if let Ok(outcome) = rx.try_recv() {
                        return Ok(outcome);
                    }
                }
                tracing::warn!(device = %device_id, "Pairing timed out, no ack received");
                Ok(PairingOutcome::TimedOut)
            }
        }
    }

    /// Handle an inbound acknowledgment payload
    ///
    /// Malformed payloads and acks with no matching pending request are
    /// dropped with a log line; they never crash the delivery flow.
    pub async fn handle_ack(&self, payload: &[u8]) {
        let ack: PairingAck = match serde_json::from_slice(payload) {
            Ok(ack) => ack,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed pairing ack");
                return;
            }
        };

        let mut pending = self.pending.lock().await;

        let is_match = match pending.as_ref() {
            None => {
                tracing::debug!(
                    device = %ack.device_id,
                    status = %ack.status,
                    "No pairing in flight, dropping late ack"
                );
                return;
            }
            Some(current) => current.device_id == ack.device_id,
        };

        if !is_match {
            tracing::warn!(
                device = %ack.device_id,
                "Ack does not match the pending pairing request, ignoring"
            );
            return;
        }

        if let Some(current) = pending.take() {
            let outcome = if ack.is_paired() {
                PairingOutcome::Paired {
                    device_id: ack.device_id.clone(),
                }
            } else {
                PairingOutcome::Failed {
                    device_id: ack.device_id.clone(),
                    status: ack.status.clone(),
                }
            };

            tracing::info!(
                device = %ack.device_id,
                requester = %current.requester_identity,
                status = %ack.status,
                "Pairing ack received"
            );

            if current.reply.send(outcome).is_err() {
                tracing::debug!(
                    device = %ack.device_id,
                    "Pairing waiter already gone, result dropped"
                );
            }
        }
    }
}
