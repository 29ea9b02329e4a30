//! In-process transport for tests and single-process deployments
//!
//! One broadcast channel per subject. Messages published with no active
//! subscriber are dropped, matching the best-effort contract. The
//! connected flag is settable so callers can exercise unavailable-transport
//! paths.

use super::{InboundMessage, Subscription, Transport};
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

const DEFAULT_CAPACITY: usize = 256;

/// In-memory pub/sub transport
pub struct MemoryTransport {
    channels: Mutex<HashMap<String, broadcast::Sender<InboundMessage>>>,
    connected: AtomicBool,
    capacity: usize,
}

impl MemoryTransport {
    /// Create a connected in-memory transport
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            connected: AtomicBool::new(true),
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Flip the connected flag (for exercising failure paths)
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    fn sender(&self, subject: &str) -> broadcast::Sender<InboundMessage> {
        let mut channels = self
            .channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        channels
            .entry(subject.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<()> {
        if !self.is_connected() {
            return Err(BridgeError::TransportUnavailable(
                "memory transport marked disconnected".to_string(),
            ));
        }

        let message = InboundMessage {
            subject: subject.to_string(),
            payload,
        };

        // No receivers means nobody is listening; best-effort drop.
        let _ = self.sender(subject).send(message);
        Ok(())
    }

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>> {
        if !self.is_connected() {
            return Err(BridgeError::Subscribe {
                subject: subject.to_string(),
                reason: "memory transport marked disconnected".to_string(),
            });
        }

        let receiver = self.sender(subject).subscribe();
        Ok(Box::new(MemorySubscription {
            stream: BroadcastStream::new(receiver),
        }))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Subscription handle over an in-memory broadcast stream
pub struct MemorySubscription {
    stream: BroadcastStream<InboundMessage>,
}

#[async_trait]
impl Subscription for MemorySubscription {
    async fn next(&mut self) -> Result<Option<InboundMessage>> {
        loop {
            match self.stream.next().await {
                Some(Ok(message)) => return Ok(Some(message)),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    tracing::warn!(skipped, "Subscriber lagged, messages dropped");
                }
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let transport = MemoryTransport::new();
        let mut sub = transport.subscribe("simon.scores").await.unwrap();

        transport
            .publish("simon.scores", Bytes::from_static(b"{\"n\":1}"))
            .await
            .unwrap();

        let msg = sub.next().await.unwrap().unwrap();
        assert_eq!(msg.subject, "simon.scores");
        assert_eq!(&msg.payload[..], b"{\"n\":1}");
    }

    #[tokio::test]
    async fn test_publish_without_subscriber_is_dropped() {
        let transport = MemoryTransport::new();
        transport
            .publish("simon.pair", Bytes::from_static(b"{}"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_subjects_are_isolated() {
        let transport = MemoryTransport::new();
        let mut scores = transport.subscribe("simon.scores").await.unwrap();
        let mut acks = transport.subscribe("simon.pair.ack").await.unwrap();

        transport
            .publish("simon.pair.ack", Bytes::from_static(b"ack"))
            .await
            .unwrap();

        let msg = acks.next().await.unwrap().unwrap();
        assert_eq!(&msg.payload[..], b"ack");

        // The scores subscription saw nothing
        let pending = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            scores.next(),
        )
        .await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn test_disconnected_publish_fails() {
        let transport = MemoryTransport::new();
        transport.set_connected(false);
        assert!(!transport.is_connected());

        let result = transport
            .publish("simon.pair", Bytes::from_static(b"{}"))
            .await;
        assert!(matches!(result, Err(BridgeError::TransportUnavailable(_))));
    }
}
