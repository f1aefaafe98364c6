//! Core functionality for the snapfeed real-time server

pub mod calls;
pub mod connection;
pub mod dispatcher;
pub mod events;
pub mod presence;
pub mod room;
pub mod server;
pub mod session;

// Re-export main components for convenience
pub use calls::{CallRegistry, CallSession, CallState};
pub use connection::Connection;
pub use dispatcher::EventDispatcher;
pub use events::{ClientEvent, ServerEvent};
pub use presence::{PresenceDirectory, PresenceEntry};
pub use room::RoomManager;
pub use server::{ServerManager, SharedServerManager};
pub use session::SessionManager;
