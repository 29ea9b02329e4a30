//! Bridge wiring: transport, correlator, ingester, and store
//!
//! `Bridge` owns all the moving parts and runs the inbound dispatch.
//! Acknowledgments and score reports arrive on separate subscriptions,
//! each drained by its own task, so a slow score append can never delay
//! ack delivery to a waiting pairing caller.

use crate::config::BridgeConfig;
use crate::correlator::PairingCorrelator;
use crate::error::Result;
use crate::ingest::ScoreIngester;
use crate::query::Scoreboard;
use crate::store::ScoreStore;
use crate::transport::{NatsTransport, Subscription, Transport};
use crate::types::PairingOutcome;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Pairing and telemetry bridge over a pub/sub transport
pub struct Bridge {
    config: BridgeConfig,
    transport: Arc<dyn Transport>,
    correlator: Arc<PairingCorrelator>,
    store: Arc<ScoreStore>,
    ingester: Arc<ScoreIngester>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Bridge {
    /// Connect to NATS and build a bridge from the configuration
    pub async fn connect(config: BridgeConfig) -> Result<Self> {
        let transport = Arc::new(NatsTransport::connect(&config.url).await?);
        Ok(Self::with_transport(config, transport))
    }

    /// Build a bridge over an already-constructed transport
    pub fn with_transport(config: BridgeConfig, transport: Arc<dyn Transport>) -> Self {
        let store = Arc::new(ScoreStore::new(&config.scores_path));
        let correlator = Arc::new(PairingCorrelator::new(
            transport.clone(),
            config.pair_subject(),
            config.pairing_timeout(),
        ));
        let ingester = Arc::new(ScoreIngester::new(store.clone()));

        Self {
            config,
            transport,
            correlator,
            store,
            ingester,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to the inbound subjects and start dispatching
    pub async fn start(&self) -> Result<()> {
        let acks = self.transport.subscribe(&self.config.ack_subject()).await?;
        let scores = self
            .transport
            .subscribe(&self.config.scores_subject())
            .await?;

        let correlator = self.correlator.clone();
        let ack_task = tokio::spawn(async move {
            drain(acks, "pairing ack", |payload| {
                let correlator = correlator.clone();
                async move { correlator.handle_ack(&payload).await }
            })
            .await;
        });

        let ingester = self.ingester.clone();
        let score_task = tokio::spawn(async move {
            drain(scores, "score report", |payload| {
                let ingester = ingester.clone();
                async move { ingester.handle_report(&payload).await }
            })
            .await;
        });

        let mut tasks = self
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tasks.push(ack_task);
        tasks.push(score_task);

        tracing::info!(
            ack_subject = %self.config.ack_subject(),
            scores_subject = %self.config.scores_subject(),
            "Bridge dispatch started"
        );
        Ok(())
    }

    /// Pair a device: publish the command and wait for its acknowledgment
    pub async fn pair(
        &self,
        device_id: &str,
        credential_secret: &str,
        requester_identity: &str,
    ) -> Result<PairingOutcome> {
        self.correlator
            .request_pairing(device_id, credential_secret, requester_identity)
            .await
    }

    /// Read-only scoreboard over the score log
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::new(self.store.clone())
    }

    /// The underlying score store
    pub fn store(&self) -> &Arc<ScoreStore> {
        &self.store
    }

    /// The bridge configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Stop the dispatch tasks
    pub fn shutdown(&self) {
        let mut tasks = self
            .tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Drain one subscription, handing each payload to `handle`
///
/// Handler faults are the handler's business (log and drop); this loop only
/// ends when the subscription closes or the transport reports an error.
async fn drain<F, Fut>(mut subscription: Box<dyn Subscription>, kind: &str, handle: F)
where
    F: Fn(bytes::Bytes) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    loop {
        match subscription.next().await {
            Ok(Some(message)) => handle(message.payload).await,
            Ok(None) => {
                tracing::info!(kind, "Subscription closed, dispatch ending");
                break;
            }
            Err(e) => {
                tracing::warn!(kind, error = %e, "Subscription error, dispatch ending");
                break;
            }
        }
    }
}
