//! Presence directory mapping application identities to live connections
//!
//! Single source of truth for "is user X reachable right now". The map is
//! keyed by user id, so disconnect cleanup removes by connection-id value:
//! a superseded mapping must not be erased when the stale connection
//! finally closes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// A registered user-to-connection mapping
#[derive(Debug, Clone)]
pub struct PresenceEntry {
    pub connection_id: String,
    pub connected_at: DateTime<Utc>,
}

/// Owns the user id → connection mapping
pub struct PresenceDirectory {
    entries: HashMap<String, PresenceEntry>,
}

impl PresenceDirectory {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register or overwrite the mapping for a user. Last write wins; a
    /// second announcement supersedes any prior entry for the same user.
    pub fn announce(&mut self, user_id: String, connection_id: String) {
        self.entries.insert(
            user_id,
            PresenceEntry {
                connection_id,
                connected_at: Utc::now(),
            },
        );
    }

    /// Look up the live connection for a user. `None` means offline, not an
    /// error.
    pub fn resolve(&self, user_id: &str) -> Option<&str> {
        self.entries
            .get(user_id)
            .map(|entry| entry.connection_id.as_str())
    }

    /// Remove whichever entry points at this connection, if any. At most one
    /// entry is removed; `announce` already enforces one entry per user.
    /// Returns the user id that was mapped to the connection.
    pub fn remove_connection(&mut self, connection_id: &str) -> Option<String> {
        let user_id = self
            .entries
            .iter()
            .find(|(_, entry)| entry.connection_id == connection_id)
            .map(|(user_id, _)| user_id.clone())?;

        self.entries.remove(&user_id);
        Some(user_id)
    }

    /// Number of users currently online
    pub fn online_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for PresenceDirectory {
    fn default() -> Self {
        Self::new()
    }
}
