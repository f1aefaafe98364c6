use std::collections::HashMap;
use tokio::sync::mpsc;
use warp::ws::Message as WsMessage;

use crate::core::connection::Connection;
use crate::core::events::ServerEvent;

// Manages live client connections keyed by connection id
pub struct SessionManager {
    connections: HashMap<String, Connection>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    // Register a new client connection
    pub fn register(&mut self, id: String, sender: mpsc::UnboundedSender<WsMessage>) {
        let connection = Connection::with_id(id.clone(), sender);
        self.connections.insert(id, connection);
    }

    // Remove a client connection
    pub fn unregister(&mut self, id: &str) {
        self.connections.remove(id);
    }

    pub fn get_connection(&self, id: &str) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Broadcast a server event to every connected client, sender included.
    /// Feed-wide events (new post, like and comment updates) use this scope.
    pub fn broadcast_all(&self, event: &ServerEvent) -> usize {
        let text = match serde_json::to_string(event) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to serialize broadcast event: {}", e);
                return 0;
            }
        };

        let ws_message = WsMessage::text(text);
        let mut success_count = 0;

        for connection in self.connections.values() {
            if connection.sender.send(ws_message.clone()).is_ok() {
                success_count += 1;
            }
        }

        success_count
    }

    // Get current clients count
    pub fn client_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
