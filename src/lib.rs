//! Snapfeed - the real-time core of a social feed backend
//!
//! This library provides presence tracking, room-scoped and feed-wide
//! broadcast, and call-signaling relay over a single WebSocket per client.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;
pub mod storage;

// Re-export main components
pub use config::ServerConfig;
pub use constants::*;
