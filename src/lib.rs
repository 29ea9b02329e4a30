//! # simon-bridge
//!
//! Synchronous device pairing and durable score logging over asynchronous
//! publish/subscribe.
//!
//! ## Overview
//!
//! The transport (NATS in production, in-memory for tests) only offers
//! fire-and-forget topic messaging. `simon-bridge` layers two things on top:
//!
//! - a **pairing correlator** that turns a published pairing command plus a
//!   correlated acknowledgment into one blocking call with a bounded
//!   timeout, and
//! - a **score log** that appends a continuous telemetry stream to a single
//!   JSON file, serialized so concurrent appends and dashboard reads never
//!   corrupt it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use simon_bridge::{Bridge, BridgeConfig, PairingOutcome};
//!
//! # async fn example() -> simon_bridge::Result<()> {
//! let bridge = Bridge::connect(BridgeConfig::default()).await?;
//! bridge.start().await?;
//!
//! match bridge.pair("simon-42", "", "alice").await? {
//!     PairingOutcome::Paired { device_id } => println!("{} paired", device_id),
//!     PairingOutcome::Failed { status, .. } => println!("device reported: {}", status),
//!     PairingOutcome::TimedOut => println!("no response from device"),
//! }
//!
//! let scores = bridge.scoreboard().list_recent(50).await;
//! println!("{} recent scores", scores.len());
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod config;
pub mod correlator;
pub mod error;
pub mod ingest;
pub mod query;
pub mod store;
pub mod transport;
pub mod types;

// Re-export core types
pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use correlator::PairingCorrelator;
pub use error::{BridgeError, Result};
pub use ingest::ScoreIngester;
pub use query::Scoreboard;
pub use store::ScoreStore;
pub use transport::{InboundMessage, MemoryTransport, NatsTransport, Subscription, Transport};
pub use types::{PairingAck, PairingCommand, PairingOutcome, ScoreEvent, ScoreReport};
