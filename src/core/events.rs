//! Wire protocol for the real-time channel
//!
//! Inbound and outbound events are closed tagged enums so routing is
//! exhaustive at compile time. An event name the enum does not know fails
//! deserialization at the boundary and is dropped there, which keeps
//! protocol drift from crashing a connection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::storage::traits::{ChatMessage, Post};

/// Client-to-server events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ClientEvent {
    /// Announce the application identity behind this connection
    #[serde(rename = "userOnline", rename_all = "camelCase")]
    UserOnline { user_id: String },

    /// Join a chat conversation room
    #[serde(rename = "joinChat", rename_all = "camelCase")]
    JoinChat { chat_id: String },

    /// Send a message to a chat room
    #[serde(rename = "sendMessage", rename_all = "camelCase")]
    SendMessage {
        chat_id: String,
        sender_id: String,
        text: String,
    },

    /// Like a post (no-op if already liked)
    #[serde(rename = "likePost", rename_all = "camelCase")]
    LikePost { post_id: String, user_id: String },

    /// Comment on a post
    #[serde(rename = "commentPost", rename_all = "camelCase")]
    CommentPost {
        post_id: String,
        user_id: String,
        text: String,
    },

    /// Announce a new post to the feed
    #[serde(rename = "newPost")]
    NewPost { post: Post },

    /// Place a call to another user
    #[serde(rename = "callUser", rename_all = "camelCase")]
    CallUser {
        user_to_call: String,
        signal_data: Value,
        from: String,
        name: String,
        call_type: String,
    },

    /// Answer a ringing call; `to` is the caller's connection id
    #[serde(rename = "answerCall")]
    AnswerCall { to: String, signal: Value },

    /// Reject a ringing call
    #[serde(rename = "rejectCall")]
    RejectCall { to: String },

    /// Hang up a call
    #[serde(rename = "endCall")]
    EndCall { to: String },
}

/// Server-to-client events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ServerEvent {
    /// Connection established; clients use the id to address call answers
    #[serde(rename = "connected", rename_all = "camelCase")]
    Connected { connection_id: String },

    /// Chat message delivered to a room
    #[serde(rename = "receiveMessage")]
    ReceiveMessage { message: ChatMessage },

    /// A post's likes or comments changed
    #[serde(rename = "postUpdated")]
    PostUpdated { post: Post },

    /// A new post entered the feed
    #[serde(rename = "newPost")]
    NewPost { post: Post },

    /// Incoming call offer
    #[serde(rename = "callUser", rename_all = "camelCase")]
    CallUser {
        signal: Value,
        from: String,
        name: String,
        call_type: String,
    },

    /// A placed call could not be delivered
    #[serde(rename = "callFailed")]
    CallFailed { message: String },

    /// The callee accepted; carries the answer payload
    #[serde(rename = "callAccepted")]
    CallAccepted { signal: Value },

    /// The callee rejected the call
    #[serde(rename = "callRejected")]
    CallRejected,

    /// The call was hung up
    #[serde(rename = "callEnded")]
    CallEnded,

    /// Requester-only error surface
    #[serde(rename = "error")]
    Error { code: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_wire_names() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"userOnline","userId":"alice"}"#).unwrap();
        assert!(matches!(event, ClientEvent::UserOnline { user_id } if user_id == "alice"));

        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"callUser","userToCall":"bob","signalData":{"sdp":"x"},"from":"conn-1","name":"Alice","callType":"video"}"#,
        )
        .unwrap();
        assert!(matches!(event, ClientEvent::CallUser { user_to_call, .. } if user_to_call == "bob"));
    }

    #[test]
    fn test_unknown_event_fails_deserialization() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"event":"typingIndicator","chatId":"c1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_serialization() {
        let json = serde_json::to_value(&ServerEvent::CallFailed {
            message: "User is not online: bob".to_string(),
        })
        .unwrap();
        assert_eq!(json["event"], "callFailed");

        let json = serde_json::to_value(&ServerEvent::CallRejected).unwrap();
        assert_eq!(json["event"], "callRejected");
    }
}
