//! Inbound event routing
//!
//! Single entry point for everything a connection sends. Frames are decoded
//! into the closed `ClientEvent` enum; names outside the contract fail to
//! decode and are dropped without a reply, so protocol drift never crashes a
//! connection. A handler error aborts only that handler and is surfaced to
//! the requesting connection alone.

use log::{debug, warn};

use crate::constants::MAX_EVENT_SIZE;
use crate::core::events::{ClientEvent, ServerEvent};
use crate::core::server::SharedServerManager;
use crate::error::{Result, SnapfeedError};

/// Routes inbound client events to the server manager
pub struct EventDispatcher {
    server: SharedServerManager,
}

impl EventDispatcher {
    pub fn new(server: SharedServerManager) -> Self {
        Self { server }
    }

    /// Process one inbound text frame from a connection
    pub async fn dispatch(&self, sender_conn: &str, frame: &str) -> Result<()> {
        if frame.len() > MAX_EVENT_SIZE {
            return Err(SnapfeedError::MessageTooLarge(frame.len()));
        }

        let event: ClientEvent = match serde_json::from_str(frame) {
            Ok(event) => event,
            Err(e) => {
                // Unrecognized or malformed events are silently ignored
                debug!("Dropping unrecognized event from {}: {}", sender_conn, e);
                return Ok(());
            }
        };

        match event {
            ClientEvent::UserOnline { user_id } => {
                self.server.announce_online(sender_conn, user_id).await;
            }

            ClientEvent::JoinChat { chat_id } => {
                self.server.join_chat(sender_conn, chat_id).await;
            }

            ClientEvent::SendMessage {
                chat_id,
                sender_id,
                text,
            } => {
                if let Err(e) = self
                    .server
                    .send_chat_message(chat_id, sender_id, text)
                    .await
                {
                    self.report_error(sender_conn, e).await;
                }
            }

            ClientEvent::LikePost { post_id, user_id } => {
                if let Err(e) = self.server.like_post(&post_id, &user_id).await {
                    self.report_error(sender_conn, e).await;
                }
            }

            ClientEvent::CommentPost {
                post_id,
                user_id,
                text,
            } => {
                if let Err(e) = self.server.comment_post(&post_id, &user_id, &text).await {
                    self.report_error(sender_conn, e).await;
                }
            }

            ClientEvent::NewPost { post } => {
                self.server.publish_new_post(post).await;
            }

            ClientEvent::CallUser {
                user_to_call,
                signal_data,
                from,
                name,
                call_type,
            } => {
                self.server
                    .call_user(sender_conn, &user_to_call, signal_data, from, name, call_type)
                    .await;
            }

            ClientEvent::AnswerCall { to, signal } => {
                self.server.answer_call(sender_conn, &to, signal).await;
            }

            ClientEvent::RejectCall { to } => {
                self.server.reject_call(sender_conn, &to).await;
            }

            ClientEvent::EndCall { to } => {
                self.server.end_call(sender_conn, &to).await;
            }
        }

        Ok(())
    }

    /// Surface a handler error to the requesting connection only
    async fn report_error(&self, sender_conn: &str, error: SnapfeedError) {
        warn!("Handler error for {}: {}", sender_conn, error);

        let code = match &error {
            SnapfeedError::PostNotFound(_) => "not_found",
            SnapfeedError::StorageError(_) => "storage_error",
            _ => "internal_error",
        };

        self.server
            .send_to_connection(
                sender_conn,
                &ServerEvent::Error {
                    code: code.to_string(),
                    message: error.to_string(),
                },
            )
            .await;
    }
}
