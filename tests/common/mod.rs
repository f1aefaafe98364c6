//! Shared helpers for integration tests
//!
//! Tests drive the library types directly and observe delivery through the
//! mpsc channels registered for each fake connection.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use warp::ws::Message;

use snapfeed::config::ServerConfig;
use snapfeed::core::server::{ServerManager, SharedServerManager};
use snapfeed::storage::memory::MemoryStore;

pub fn short_ring_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ring_timeout: Duration::from_millis(50),
        ring_sweep_interval: Duration::from_millis(10),
    }
}

/// Build a server manager over a fresh in-memory store, returning both so
/// tests can inspect storage directly.
pub fn test_server() -> (SharedServerManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let server = Arc::new(ServerManager::new(store.clone(), short_ring_config()));
    (server, store)
}

/// Register a fake connection and return its delivery channel
pub async fn connect(
    server: &SharedServerManager,
    connection_id: &str,
) -> mpsc::UnboundedReceiver<Message> {
    let (tx, rx) = mpsc::unbounded_channel();
    server.register_connection(connection_id.to_string(), tx).await;
    rx
}

/// Collect every event delivered so far as parsed JSON
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Message>) -> Vec<serde_json::Value> {
    let mut events = Vec::new();
    while let Ok(message) = rx.try_recv() {
        if let Ok(text) = message.to_str() {
            events.push(serde_json::from_str(text).expect("delivered frame is valid JSON"));
        }
    }
    events
}

/// Events of one kind delivered so far
pub fn drain_of(rx: &mut mpsc::UnboundedReceiver<Message>, event: &str) -> Vec<serde_json::Value> {
    drain(rx)
        .into_iter()
        .filter(|value| value["event"] == event)
        .collect()
}
