//! In-memory storage backend
//!
//! Holds posts and messages in process memory behind async RwLocks. The like
//! and comment mutations take the write lock for the whole read-modify-write,
//! which provides the atomic check-and-insert the `FeedStore` contract asks
//! for.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{Result, SnapfeedError};
use crate::storage::traits::{ChatMessage, Comment, FeedStore, Post};

/// In-memory feed storage
pub struct MemoryStore {
    posts: RwLock<HashMap<String, Post>>,
    messages: RwLock<Vec<ChatMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            messages: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored messages
    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn find_post_by_id(&self, post_id: &str) -> Result<Post> {
        let posts = self.posts.read().await;
        posts
            .get(post_id)
            .cloned()
            .ok_or_else(|| SnapfeedError::PostNotFound(post_id.to_string()))
    }

    async fn save_like_if_absent(&self, post_id: &str, user_id: &str) -> Result<Post> {
        let mut posts = self.posts.write().await;
        let post = posts
            .get_mut(post_id)
            .ok_or_else(|| SnapfeedError::PostNotFound(post_id.to_string()))?;

        if !post.likes.iter().any(|id| id == user_id) {
            post.likes.push(user_id.to_string());
        }

        Ok(post.clone())
    }

    async fn append_comment(&self, post_id: &str, user_id: &str, text: &str) -> Result<Post> {
        let mut posts = self.posts.write().await;
        let post = posts
            .get_mut(post_id)
            .ok_or_else(|| SnapfeedError::PostNotFound(post_id.to_string()))?;

        post.comments.push(Comment {
            user_id: user_id.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        });

        Ok(post.clone())
    }

    async fn save_message(&self, message: ChatMessage) -> Result<ChatMessage> {
        let mut messages = self.messages.write().await;
        messages.push(message.clone());
        Ok(message)
    }

    async fn create_post(&self, post: Post) -> Result<Post> {
        let mut posts = self.posts.write().await;
        posts.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let mut all: Vec<Post> = posts.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

/// Shared reference to a feed store
pub type SharedFeedStore = Arc<dyn FeedStore>;

/// Create a new shared in-memory store
pub fn create_memory_store() -> SharedFeedStore {
    Arc::new(MemoryStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_like_is_idempotent() {
        let store = MemoryStore::new();
        let post = store
            .create_post(Post::new("alice".into(), "http://img/1".into(), "hi".into()))
            .await
            .unwrap();

        store.save_like_if_absent(&post.id, "bob").await.unwrap();
        let updated = store.save_like_if_absent(&post.id, "bob").await.unwrap();

        assert_eq!(updated.likes, vec!["bob".to_string()]);
    }

    #[tokio::test]
    async fn test_comments_append_in_order() {
        let store = MemoryStore::new();
        let post = store
            .create_post(Post::new("alice".into(), "http://img/1".into(), "hi".into()))
            .await
            .unwrap();

        store.append_comment(&post.id, "bob", "first").await.unwrap();
        let updated = store
            .append_comment(&post.id, "carol", "second")
            .await
            .unwrap();

        assert_eq!(updated.comments.len(), 2);
        assert_eq!(updated.comments[0].text, "first");
        assert_eq!(updated.comments[1].text, "second");
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let store = MemoryStore::new();
        let result = store.save_like_if_absent("nope", "bob").await;
        assert!(matches!(result, Err(SnapfeedError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_posts_newest_first() {
        let store = MemoryStore::new();
        let first = store
            .create_post(Post::new("alice".into(), "http://img/1".into(), "one".into()))
            .await
            .unwrap();
        let mut newer = Post::new("bob".into(), "http://img/2".into(), "two".into());
        newer.created_at = first.created_at + chrono::Duration::seconds(1);
        store.create_post(newer.clone()).await.unwrap();

        let all = store.list_posts().await.unwrap();
        assert_eq!(all[0].id, newer.id);
        assert_eq!(all[1].id, first.id);
    }
}
