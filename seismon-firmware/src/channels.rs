//! Inter-task communication
//!
//! Static shared state between Embassy tasks. The metrics store is the
//! single sampler-to-publisher handoff point; everything else is
//! lightweight status plumbing.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, Ordering};

use seismon_core::connectivity::ConnectionState;
use seismon_core::metrics::MetricsStore;

/// Latest reduced vibration metrics, written once per second by the
/// sampler and read by the control task at publish time
pub static METRICS: MetricsStore<CriticalSectionRawMutex> = MetricsStore::new();

/// Total accelerometer samples taken since boot
pub static SAMPLE_COUNT: AtomicU32 = AtomicU32::new(0);

/// Periodic status snapshot for the log task
pub static STATUS: Signal<CriticalSectionRawMutex, StatusSnapshot> = Signal::new();

/// A point-in-time view of node state, published by the control task
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    pub state: ConnectionState,
    pub rssi_dbm: i16,
    pub published: u32,
}

/// Record one sample taken (called from the sampler loop)
pub fn count_sample() {
    SAMPLE_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Samples taken since boot
pub fn samples_taken() -> u32 {
    SAMPLE_COUNT.load(Ordering::Relaxed)
}
