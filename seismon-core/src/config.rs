//! Build-time configuration constants
//!
//! Rates, window sizes, intervals, and timeouts are fixed at compile time;
//! there is no runtime reconfiguration surface.

/// IMU sampling rate in Hz
pub const SAMPLE_RATE_HZ: u32 = 500;

/// Sampling tick period in microseconds
pub const SAMPLE_PERIOD_US: u64 = 1_000_000 / SAMPLE_RATE_HZ as u64;

/// Samples per reduction window (one second at the sample rate)
pub const WINDOW_SAMPLES: usize = 500;

/// Telemetry publish interval in milliseconds
pub const TELEMETRY_INTERVAL_MS: u64 = 5000;

/// Low-rate control loop tick in milliseconds
pub const CONTROL_TICK_MS: u64 = 100;

/// Status consumer refresh interval in milliseconds
pub const STATUS_INTERVAL_MS: u64 = 500;

/// Upper bound on one link-level connect attempt in milliseconds
pub const LINK_CONNECT_TIMEOUT_MS: u64 = 30_000;

/// Delay between link-level connect attempts in milliseconds
pub const LINK_RETRY_DELAY_MS: u64 = 5000;

/// Upper bound on one session handshake attempt in milliseconds
pub const SESSION_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Topic prefix for telemetry reports
pub const TOPIC_PREFIX: &str = "dt/vibration";
