//! Transport trait: the pub/sub abstraction the bridge is built on
//!
//! The bridge treats the transport as a black-box publish/subscribe channel
//! delivering `(subject, payload)` messages. Backends only need best-effort
//! delivery; connection lifecycle (reconnects, TLS) is their concern.

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

pub mod memory;
pub mod nats;

pub use memory::MemoryTransport;
pub use nats::NatsTransport;

/// A message delivered by the transport
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Subject the message arrived on
    pub subject: String,

    /// Raw payload bytes
    pub payload: Bytes,
}

/// Core trait for pub/sub transport backends
///
/// Implementations handle the wire-level details. The correlator and the
/// bridge dispatch loop only see subjects and payloads.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Publish a payload to a subject, making at least one delivery attempt
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<()>;

    /// Subscribe to a subject, returning a stream of inbound messages
    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>>;

    /// Whether the transport currently holds a live connection
    fn is_connected(&self) -> bool;

    /// Transport name (e.g., "nats", "memory")
    fn name(&self) -> &str;
}

/// Async handle for receiving messages from one subscription
#[async_trait]
pub trait Subscription: Send + Sync {
    /// Receive the next message; `None` when the subscription is closed
    async fn next(&mut self) -> Result<Option<InboundMessage>>;
}
