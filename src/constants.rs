pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const WS_PATH: &str = "ws";
pub const DEFAULT_RING_TIMEOUT_SECS: u64 = 45;
pub const DEFAULT_RING_SWEEP_SECS: u64 = 5;
pub const MAX_EVENT_SIZE: usize = 64 * 1024;
