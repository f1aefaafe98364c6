//! Server configuration module
//! Handles dynamic configuration parameters for the snapfeed server

use crate::constants::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RING_SWEEP_SECS, DEFAULT_RING_TIMEOUT_SECS,
};
use crate::error::{Result, SnapfeedError};
use std::env;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long a placed call may ring before it is failed
    pub ring_timeout: Duration,
    /// Interval of the background sweep that expires ringing calls
    pub ring_sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            ring_timeout: Duration::from_secs(DEFAULT_RING_TIMEOUT_SECS),
            ring_sweep_interval: Duration::from_secs(DEFAULT_RING_SWEEP_SECS),
        }
    }
}

impl ServerConfig {
    /// Create a test configuration with a short ring timeout
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: 0,
            ring_timeout: Duration::from_millis(100),
            ring_sweep_interval: Duration::from_millis(20),
        }
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("SNAPFEED_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("SNAPFEED_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let ring_timeout_secs: u64 = env::var("SNAPFEED_RING_TIMEOUT")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_RING_TIMEOUT_SECS);

        let ring_sweep_secs: u64 = env::var("SNAPFEED_RING_SWEEP")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_RING_SWEEP_SECS);

        Self::build(host, port, ring_timeout_secs, ring_sweep_secs)
    }

    /// Validate raw configuration values
    fn build(
        host: String,
        port: u16,
        ring_timeout_secs: u64,
        ring_sweep_secs: u64,
    ) -> Result<Self> {
        if ring_timeout_secs == 0 {
            return Err(SnapfeedError::ConfigError(
                "SNAPFEED_RING_TIMEOUT must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            ring_timeout: Duration::from_secs(ring_timeout_secs),
            ring_sweep_interval: Duration::from_secs(ring_sweep_secs.max(1)),
        })
    }
}
