use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SnapfeedError {
    // Storage errors
    StorageError(String),
    PostNotFound(String),

    // Message errors
    MessageTooLarge(usize),

    // Call signaling errors
    CallSessionNotFound(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for SnapfeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::PostNotFound(id) => write!(f, "Post not found: {}", id),
            Self::MessageTooLarge(size) => write!(f, "Message too large: {} bytes", size),
            Self::CallSessionNotFound(conn_id) => {
                write!(f, "No active call session for connection: {}", conn_id)
            }
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for SnapfeedError {}

// Generic result type for snapfeed
pub type Result<T> = std::result::Result<T, SnapfeedError>;
