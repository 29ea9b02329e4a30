//! NATS core pub/sub transport
//!
//! Uses plain NATS subjects (no JetStream): the bridge only needs
//! fire-and-forget delivery, correlation is handled above the transport.

use super::{InboundMessage, Subscription, Transport};
use crate::error::{BridgeError, Result};
use async_nats::connection::State;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

/// Transport backed by a NATS core connection
pub struct NatsTransport {
    client: async_nats::Client,
}

impl NatsTransport {
    /// Connect to a NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| BridgeError::Connection(format!("{}: {}", url, e)))?;

        tracing::info!(url = %url, "Connected to NATS");

        Ok(Self { client })
    }

    /// Wrap an existing NATS client
    pub fn from_client(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for NatsTransport {
    async fn publish(&self, subject: &str, payload: Bytes) -> Result<()> {
        self.client
            .publish(subject.to_string(), payload)
            .await
            .map_err(|e| BridgeError::Publish {
                subject: subject.to_string(),
                reason: e.to_string(),
            })?;

        // Force the command onto the wire before the caller starts waiting
        // for a correlated reply.
        self.client.flush().await.map_err(|e| BridgeError::Publish {
            subject: subject.to_string(),
            reason: format!("flush failed: {}", e),
        })?;

        tracing::debug!(subject = %subject, "Message published");
        Ok(())
    }

    async fn subscribe(&self, subject: &str) -> Result<Box<dyn Subscription>> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| BridgeError::Subscribe {
                subject: subject.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(subject = %subject, "Subscription ready");
        Ok(Box::new(NatsSubscription { subscriber }))
    }

    fn is_connected(&self) -> bool {
        self.client.connection_state() == State::Connected
    }

    fn name(&self) -> &str {
        "nats"
    }
}

/// Subscription handle over a NATS subscriber stream
pub struct NatsSubscription {
    subscriber: async_nats::Subscriber,
}

#[async_trait]
impl Subscription for NatsSubscription {
    async fn next(&mut self) -> Result<Option<InboundMessage>> {
        Ok(self.subscriber.next().await.map(|msg| InboundMessage {
            subject: msg.subject.to_string(),
            payload: msg.payload,
        }))
    }
}
