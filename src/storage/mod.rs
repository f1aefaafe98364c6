pub mod memory;
pub mod traits;

pub use memory::{create_memory_store, MemoryStore, SharedFeedStore};
pub use traits::{ChatMessage, Comment, FeedStore, Post};
