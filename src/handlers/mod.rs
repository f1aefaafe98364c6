//! Request handlers for WebSocket and HTTP endpoints

pub mod posts;
pub mod websocket;
