//! Abstract storage interface for pluggable backends
//!
//! The real-time core does not own the persisted schema of posts, messages,
//! or users; it only needs the mutations below. Backends must make
//! `save_like_if_absent` an atomic check-and-insert and `append_comment` an
//! atomic append, since concurrent handlers for the same post interleave at
//! every await point.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// A comment attached to a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A feed post as rebroadcast to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub image_url: String,
    pub caption: String,
    pub likes: Vec<String>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(user_id: String, image_url: String, caption: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            image_url,
            caption,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A persisted chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(chat_id: String, sender_id: String, text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            sender_id,
            text,
            created_at: Utc::now(),
        }
    }
}

/// Storage interface required by the real-time core
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Look up a post by id
    async fn find_post_by_id(&self, post_id: &str) -> Result<Post>;

    /// Insert `user_id` into the post's like set only if not already present,
    /// returning the updated post. Must be atomic with respect to concurrent
    /// likers of the same post.
    async fn save_like_if_absent(&self, post_id: &str, user_id: &str) -> Result<Post>;

    /// Append a comment to a post, returning the updated post. Append-only;
    /// no de-duplication. Ordering follows write-arrival order.
    async fn append_comment(&self, post_id: &str, user_id: &str, text: &str) -> Result<Post>;

    /// Persist a new chat message
    async fn save_message(&self, message: ChatMessage) -> Result<ChatMessage>;

    /// Persist a new post
    async fn create_post(&self, post: Post) -> Result<Post>;

    /// List all posts, newest first
    async fn list_posts(&self) -> Result<Vec<Post>>;
}
