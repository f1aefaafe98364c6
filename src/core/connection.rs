//! WebSocket connection management
//! Handles the lifecycle of client connections

use chrono::{DateTime, Utc};
use log::warn;
use tokio::sync::mpsc;
use uuid::Uuid;
use warp::ws::Message;

use crate::core::events::ServerEvent;

/// Represents the state of a single WebSocket connection
pub struct Connection {
    pub id: String,
    pub sender: mpsc::UnboundedSender<Message>,
    pub connected_at: DateTime<Utc>,
}

impl Connection {
    /// Create a new connection with a unique ID
    pub fn new(sender: mpsc::UnboundedSender<Message>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), sender)
    }

    /// Create a connection with an explicit ID
    pub fn with_id(id: String, sender: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id,
            sender,
            connected_at: Utc::now(),
        }
    }

    /// Send a text frame through this connection
    pub fn send_text(&self, text: &str) -> bool {
        match self.sender.send(Message::text(text)) {
            Ok(_) => true,
            Err(_) => {
                warn!("Failed to send message to client {}", self.id);
                false
            }
        }
    }

    /// Serialize and send a server event through this connection
    pub fn send_event(&self, event: &ServerEvent) -> bool {
        match serde_json::to_string(event) {
            Ok(text) => self.send_text(&text),
            Err(e) => {
                warn!("Failed to serialize event for client {}: {}", self.id, e);
                false
            }
        }
    }
}
