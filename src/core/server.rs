//! Integrated server service coordinating sessions, presence, rooms, and calls

use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;
use warp::ws::Message as WsMessage;

use crate::config::ServerConfig;
use crate::core::calls::CallRegistry;
use crate::core::events::ServerEvent;
use crate::core::presence::PresenceDirectory;
use crate::core::room::RoomManager;
use crate::core::session::SessionManager;
use crate::error::Result;
use crate::storage::memory::SharedFeedStore;
use crate::storage::traits::{ChatMessage, FeedStore, Post};

/// Integrated server service that manages the real-time state together
pub struct ServerManager {
    sessions: Arc<RwLock<SessionManager>>,
    presence: Arc<RwLock<PresenceDirectory>>,
    rooms: Arc<RwLock<RoomManager>>,
    calls: Arc<RwLock<CallRegistry>>,
    store: SharedFeedStore,
    config: ServerConfig,
}

impl ServerManager {
    /// Create a new server manager over a feed store
    pub fn new(store: SharedFeedStore, config: ServerConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(SessionManager::new())),
            presence: Arc::new(RwLock::new(PresenceDirectory::new())),
            rooms: Arc::new(RwLock::new(RoomManager::new())),
            calls: Arc::new(RwLock::new(CallRegistry::new())),
            store,
            config,
        }
    }

    pub fn store(&self) -> &SharedFeedStore {
        &self.store
    }

    /// Register a new connection
    pub async fn register_connection(
        &self,
        connection_id: String,
        sender: mpsc::UnboundedSender<WsMessage>,
    ) {
        let mut sessions = self.sessions.write().await;
        sessions.register(connection_id, sender);
        info!("Current connections: {}", sessions.client_count());
    }

    /// Tear down a connection: end its calls and notify the peers, drop its
    /// presence entry if it still owns one, clear room memberships, and
    /// unregister the session.
    pub async fn disconnect(&self, connection_id: &str) {
        let peers = {
            let mut calls = self.calls.write().await;
            calls.end_for_connection(connection_id)
        };
        for peer_conn in peers {
            self.send_to_connection(&peer_conn, &ServerEvent::CallEnded)
                .await;
        }

        {
            let mut presence = self.presence.write().await;
            if let Some(user_id) = presence.remove_connection(connection_id) {
                info!("User went offline: {}", user_id);
            }
        }

        {
            let mut rooms = self.rooms.write().await;
            rooms.remove_connection(connection_id);
        }

        let mut sessions = self.sessions.write().await;
        sessions.unregister(connection_id);
        info!("Current connections: {}", sessions.client_count());
    }

    /// Register the application identity behind a connection
    pub async fn announce_online(&self, connection_id: &str, user_id: String) {
        let mut presence = self.presence.write().await;
        info!("User online: {} ({})", user_id, connection_id);
        presence.announce(user_id, connection_id.to_string());
    }

    /// Resolve a user's live connection, if any
    pub async fn resolve_user(&self, user_id: &str) -> Option<String> {
        let presence = self.presence.read().await;
        presence.resolve(user_id).map(|id| id.to_string())
    }

    /// Join a connection to a chat room
    pub async fn join_chat(&self, connection_id: &str, chat_id: String) {
        let mut rooms = self.rooms.write().await;
        rooms.join(connection_id.to_string(), chat_id);
    }

    /// Persist a chat message, then deliver it to the room
    pub async fn send_chat_message(
        &self,
        chat_id: String,
        sender_id: String,
        text: String,
    ) -> Result<ChatMessage> {
        let message = self
            .store
            .save_message(ChatMessage::new(chat_id.clone(), sender_id, text))
            .await?;

        self.broadcast_to_room(
            &chat_id,
            &ServerEvent::ReceiveMessage {
                message: message.clone(),
            },
        )
        .await;

        Ok(message)
    }

    /// Add a like if absent, then broadcast the updated post feed-wide
    pub async fn like_post(&self, post_id: &str, user_id: &str) -> Result<Post> {
        let post = self.store.save_like_if_absent(post_id, user_id).await?;
        self.broadcast_all(&ServerEvent::PostUpdated { post: post.clone() })
            .await;
        Ok(post)
    }

    /// Append a comment, then broadcast the updated post feed-wide
    pub async fn comment_post(&self, post_id: &str, user_id: &str, text: &str) -> Result<Post> {
        let post = self.store.append_comment(post_id, user_id, text).await?;
        self.broadcast_all(&ServerEvent::PostUpdated { post: post.clone() })
            .await;
        Ok(post)
    }

    /// Broadcast a new post to every connected client. The HTTP post-creation
    /// path calls this after persistence succeeds.
    pub async fn publish_new_post(&self, post: Post) {
        self.broadcast_all(&ServerEvent::NewPost { post }).await;
    }

    /// Place a call. The callee is resolved through the presence directory;
    /// an offline callee fails the call immediately with a single
    /// `callFailed` to the caller and nothing to anyone else.
    pub async fn call_user(
        &self,
        caller_conn: &str,
        user_to_call: &str,
        signal: Value,
        from: String,
        name: String,
        call_type: String,
    ) {
        let callee_conn = {
            let presence = self.presence.read().await;
            presence.resolve(user_to_call).map(|id| id.to_string())
        };

        let callee_conn = match callee_conn {
            Some(conn) => conn,
            None => {
                debug!("Call to offline user {} failed", user_to_call);
                self.send_to_connection(
                    caller_conn,
                    &ServerEvent::CallFailed {
                        message: format!("{} is not online", user_to_call),
                    },
                )
                .await;
                return;
            }
        };

        {
            let mut calls = self.calls.write().await;
            calls.place(caller_conn.to_string(), callee_conn.clone());
        }

        self.send_to_connection(
            &callee_conn,
            &ServerEvent::CallUser {
                signal,
                from,
                name,
                call_type,
            },
        )
        .await;
    }

    /// Forward a call answer to the caller's connection. Answers with no
    /// matching ringing session are dropped.
    pub async fn answer_call(&self, sender_conn: &str, to: &str, signal: Value) {
        let accepted = {
            let mut calls = self.calls.write().await;
            calls.answer(sender_conn, to)
        };

        match accepted {
            Ok(()) => {
                self.send_to_connection(to, &ServerEvent::CallAccepted { signal })
                    .await;
            }
            Err(e) => warn!("Dropping answerCall from {}: {}", sender_conn, e),
        }
    }

    /// Forward a call rejection to the caller's connection
    pub async fn reject_call(&self, sender_conn: &str, to: &str) {
        let rejected = {
            let mut calls = self.calls.write().await;
            calls.reject(sender_conn, to)
        };

        match rejected {
            Ok(()) => {
                self.send_to_connection(to, &ServerEvent::CallRejected).await;
            }
            Err(e) => warn!("Dropping rejectCall from {}: {}", sender_conn, e),
        }
    }

    /// Forward a hang-up to the peer's connection
    pub async fn end_call(&self, sender_conn: &str, to: &str) {
        let ended = {
            let mut calls = self.calls.write().await;
            calls.end(sender_conn, to)
        };

        match ended {
            Ok(()) => {
                self.send_to_connection(to, &ServerEvent::CallEnded).await;
            }
            Err(e) => warn!("Dropping endCall from {}: {}", sender_conn, e),
        }
    }

    /// Deliver an event to every member of a room
    pub async fn broadcast_to_room(&self, room_id: &str, event: &ServerEvent) -> usize {
        let members = {
            let rooms = self.rooms.read().await;
            rooms.members(room_id)
        };

        let sessions = self.sessions.read().await;
        let mut sent = 0;
        for member in members {
            if let Some(connection) = sessions.get_connection(&member) {
                if connection.send_event(event) {
                    sent += 1;
                }
            }
        }

        debug!("Broadcast to {} members of room {}", sent, room_id);
        sent
    }

    /// Deliver an event to every connected client, sender included
    pub async fn broadcast_all(&self, event: &ServerEvent) -> usize {
        let sessions = self.sessions.read().await;
        let sent = sessions.broadcast_all(event);
        debug!("Broadcast to {} connected clients", sent);
        sent
    }

    /// Deliver an event to one connection. Returns false if the connection
    /// is gone or its channel is closed.
    pub async fn send_to_connection(&self, connection_id: &str, event: &ServerEvent) -> bool {
        let sessions = self.sessions.read().await;
        match sessions.get_connection(connection_id) {
            Some(connection) => connection.send_event(event),
            None => {
                debug!("Connection not found for delivery: {}", connection_id);
                false
            }
        }
    }

    /// Get connection count
    pub async fn connection_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.client_count()
    }

    /// Expire ringing calls older than the configured timeout, notifying the
    /// caller with `callFailed` and the callee with `callEnded`.
    pub async fn expire_ringing_calls(&self) -> usize {
        let expired = {
            let mut calls = self.calls.write().await;
            calls.expire_ringing(self.config.ring_timeout)
        };

        let count = expired.len();
        for session in expired {
            warn!(
                "Ringing call {} expired after {:?}",
                session.id, self.config.ring_timeout
            );
            self.send_to_connection(
                &session.caller_conn,
                &ServerEvent::CallFailed {
                    message: "Call was not answered".to_string(),
                },
            )
            .await;
            self.send_to_connection(&session.callee_conn, &ServerEvent::CallEnded)
                .await;
        }
        count
    }

    /// Start the background sweep that expires unanswered calls
    pub fn start_ring_sweep_task(self: Arc<Self>) {
        let server = Arc::clone(&self);
        let sweep_interval = server.config.ring_sweep_interval;
        tokio::spawn(async move {
            let mut interval = interval(sweep_interval);
            loop {
                interval.tick().await;
                server.expire_ringing_calls().await;
            }
        });
    }
}

// Shared reference to server manager
pub type SharedServerManager = Arc<ServerManager>;
