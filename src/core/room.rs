//! Room membership for chat conversations
//!
//! Rooms are implicit: they come into being on first join, carry no
//! persisted lifecycle, and vanish when their last member disconnects.
//! Delivery relative to racing joins is best-effort; there is no
//! missed-message replay.

use std::collections::{HashMap, HashSet};

/// Tracks which connections belong to which chat rooms
pub struct RoomManager {
    /// Map of room id to member connection ids
    rooms: HashMap<String, HashSet<String>>,
    /// Map of connection id to the rooms it has joined
    connection_rooms: HashMap<String, HashSet<String>>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            connection_rooms: HashMap::new(),
        }
    }

    /// Add a connection to a room. Joining twice is a no-op.
    pub fn join(&mut self, connection_id: String, room_id: String) {
        self.rooms
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id.clone());
        self.connection_rooms
            .entry(connection_id)
            .or_default()
            .insert(room_id);
    }

    /// Snapshot of a room's current members
    pub fn members(&self, room_id: &str) -> Vec<String> {
        self.rooms
            .get(room_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_member(&self, connection_id: &str, room_id: &str) -> bool {
        self.rooms
            .get(room_id)
            .map(|members| members.contains(connection_id))
            .unwrap_or(false)
    }

    /// Remove a connection from every room it joined. Empty rooms are
    /// pruned so the map does not grow without bound.
    pub fn remove_connection(&mut self, connection_id: &str) {
        if let Some(joined) = self.connection_rooms.remove(connection_id) {
            for room_id in joined {
                if let Some(members) = self.rooms.get_mut(&room_id) {
                    members.remove(connection_id);
                    if members.is_empty() {
                        self.rooms.remove(&room_id);
                    }
                }
            }
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_is_idempotent() {
        let mut rooms = RoomManager::new();
        rooms.join("conn-1".into(), "chat-1".into());
        rooms.join("conn-1".into(), "chat-1".into());
        assert_eq!(rooms.members("chat-1").len(), 1);
    }

    #[test]
    fn test_connection_can_join_multiple_rooms() {
        let mut rooms = RoomManager::new();
        rooms.join("conn-1".into(), "chat-1".into());
        rooms.join("conn-1".into(), "chat-2".into());
        assert!(rooms.is_member("conn-1", "chat-1"));
        assert!(rooms.is_member("conn-1", "chat-2"));
    }

    #[test]
    fn test_disconnect_clears_memberships_and_prunes() {
        let mut rooms = RoomManager::new();
        rooms.join("conn-1".into(), "chat-1".into());
        rooms.join("conn-2".into(), "chat-1".into());
        rooms.join("conn-1".into(), "chat-2".into());

        rooms.remove_connection("conn-1");

        assert!(!rooms.is_member("conn-1", "chat-1"));
        assert!(rooms.is_member("conn-2", "chat-1"));
        // chat-2 had no other members left
        assert_eq!(rooms.room_count(), 1);
    }
}
