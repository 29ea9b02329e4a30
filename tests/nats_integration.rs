//! NATS integration tests
//!
//! These tests require a running NATS server:
//!   nats-server
//!
//! Tests are skipped automatically if NATS is not available.

use bytes::Bytes;
use simon_bridge::{
    Bridge, BridgeConfig, MemoryTransport, NatsTransport, PairingAck, PairingCommand,
    PairingOutcome, Subscription, Transport,
};
use std::sync::Arc;
use std::time::Duration;

const NATS_URL: &str = "nats://127.0.0.1:4222";

/// Try to connect to NATS. Returns None if the server is unavailable.
async fn try_nats_transport() -> Option<Arc<NatsTransport>> {
    match NatsTransport::connect(NATS_URL).await {
        Ok(transport) => Some(Arc::new(transport)),
        Err(_) => {
            eprintln!("NATS not available, skipping integration test");
            None
        }
    }
}

fn test_config(prefix: &str, timeout_secs: u64) -> BridgeConfig {
    let dir = std::env::temp_dir().join(format!("simon-bridge-nats-{}", uuid::Uuid::new_v4()));
    BridgeConfig {
        url: NATS_URL.to_string(),
        subject_prefix: format!("test.{}.simon", prefix),
        scores_path: dir.join("scores.json"),
        pairing_timeout_secs: timeout_secs,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_nats_publish_subscribe_roundtrip() {
    let transport = match try_nats_transport().await {
        Some(t) => t,
        None => return,
    };

    let subject = format!("test.roundtrip.{}", uuid::Uuid::new_v4());
    let mut sub = transport.subscribe(&subject).await.unwrap();

    transport
        .publish(&subject, Bytes::from_static(b"{\"n\":1}"))
        .await
        .unwrap();

    let msg = tokio::time::timeout(Duration::from_secs(2), sub.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(msg.subject, subject);
    assert_eq!(&msg.payload[..], b"{\"n\":1}");
}

#[tokio::test]
async fn test_nats_transport_reports_connected() {
    let transport = match try_nats_transport().await {
        Some(t) => t,
        None => return,
    };
    assert!(transport.is_connected());
    assert_eq!(transport.name(), "nats");
}

#[tokio::test]
async fn test_nats_pairing_end_to_end() {
    let transport = match try_nats_transport().await {
        Some(t) => t,
        None => return,
    };

    let config = test_config("pair_e2e", 5);
    let pair_subject = config.pair_subject();
    let ack_subject = config.ack_subject();
    let scores_dir = config.scores_path.clone();

    let bridge = Bridge::with_transport(config, transport.clone());
    bridge.start().await.unwrap();

    // Fake device on the real broker
    let device_transport = transport.clone();
    tokio::spawn(async move {
        let mut commands = device_transport.subscribe(&pair_subject).await.unwrap();
        while let Ok(Some(msg)) = commands.next().await {
            let command: PairingCommand = serde_json::from_slice(&msg.payload).unwrap();
            let ack = PairingAck {
                device_id: command.device_id,
                status: "paired".to_string(),
                requester_identity: command.requester_identity,
            };
            let payload = serde_json::to_vec(&ack).unwrap();
            device_transport
                .publish(&ack_subject, payload.into())
                .await
                .unwrap();
        }
    });

    // Let the device subscription settle on the broker
    tokio::time::sleep(Duration::from_millis(200)).await;

    let outcome = bridge.pair("simon-nats", "", "alice").await.unwrap();
    assert_eq!(
        outcome,
        PairingOutcome::Paired {
            device_id: "simon-nats".to_string()
        }
    );

    if let Some(parent) = scores_dir.parent() {
        let _ = std::fs::remove_dir_all(parent);
    }
}

#[tokio::test]
async fn test_nats_scores_end_to_end() {
    let transport = match try_nats_transport().await {
        Some(t) => t,
        None => return,
    };

    let config = test_config("scores_e2e", 5);
    let scores_subject = config.scores_subject();
    let scores_dir = config.scores_path.clone();

    let bridge = Bridge::with_transport(config, transport.clone());
    bridge.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    transport
        .publish(
            &scores_subject,
            Bytes::from_static(
                br#"{"deviceId":"simon-nats","playerName":"alice","scoreValue":11}"#,
            ),
        )
        .await
        .unwrap();

    let mut found = false;
    for _ in 0..50 {
        if bridge.store().len().await.unwrap_or(0) >= 1 {
            found = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(found, "score never reached the log");

    let recent = bridge.scoreboard().list_recent(1).await;
    assert_eq!(recent[0].player_name, "alice");
    assert_eq!(recent[0].score_value, 11);

    if let Some(parent) = scores_dir.parent() {
        let _ = std::fs::remove_dir_all(parent);
    }
}

// The memory transport mirrors the NATS contract; keep one cross-check here
// so both transports stay behaviorally aligned.
#[tokio::test]
async fn test_memory_transport_matches_contract() {
    let transport = MemoryTransport::new();
    assert!(transport.is_connected());
    assert_eq!(transport.name(), "memory");

    let mut sub = transport.subscribe("test.contract").await.unwrap();
    transport
        .publish("test.contract", Bytes::from_static(b"x"))
        .await
        .unwrap();
    let msg = sub.next().await.unwrap().unwrap();
    assert_eq!(&msg.payload[..], b"x");
}
