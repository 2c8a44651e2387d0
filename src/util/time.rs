//! Time utilities for the control tick loop

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Tick rate configuration
pub const CONTROL_TPS: u32 = 2; // 2 contest updates per second
pub const SNAPSHOT_TPS: u32 = 1; // 1 status snapshot per second
pub const TICK_DURATION_MILLIS: u64 = 1_000 / CONTROL_TPS as u64;

/// Ticks between zone status snapshots
pub const SNAPSHOT_INTERVAL_TICKS: u32 = CONTROL_TPS / SNAPSHOT_TPS;

/// Duration of a single control tick
pub fn tick_duration() -> Duration {
    Duration::from_millis(TICK_DURATION_MILLIS)
}
