//! Latest-metrics store shared between the sampling task and consumers
//!
//! A single slot holding the most recent [`VibrationMetrics`], replaced as a
//! whole value under a short-held blocking mutex. The store is the only
//! state shared between the high-rate and low-rate domains; readers copy
//! the value out and do any formatting or I/O outside the critical section.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Vibration metrics computed from one full sample window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VibrationMetrics {
    /// Root-mean-square acceleration magnitude in g
    pub rms_g: f32,
    /// Peak acceleration magnitude in g
    pub peak_g: f32,
    /// IMU die temperature in °C, 0.0 when unavailable
    pub temperature_c: f32,
    /// Monotonic milliseconds when the window completed
    pub computed_at_ms: u64,
    /// False until the first window completes
    pub valid: bool,
}

impl VibrationMetrics {
    /// Zero value returned by the store before the first publish
    pub const INVALID: Self = Self {
        rms_g: 0.0,
        peak_g: 0.0,
        temperature_c: 0.0,
        computed_at_ms: 0,
        valid: false,
    };
}

/// Single-slot, mutex-guarded holder of the latest metrics
///
/// Generic over the raw mutex so the firmware can place it in a
/// `CriticalSectionRawMutex` static while host tests use `NoopRawMutex`.
pub struct MetricsStore<M: RawMutex> {
    slot: Mutex<M, Cell<VibrationMetrics>>,
}

impl<M: RawMutex> MetricsStore<M> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(VibrationMetrics::INVALID)),
        }
    }

    /// Replace the stored metrics; always succeeds
    pub fn publish(&self, metrics: VibrationMetrics) {
        self.slot.lock(|slot| slot.set(metrics));
    }

    /// Copy out the stored metrics; `valid` is false before the first publish
    pub fn read(&self) -> VibrationMetrics {
        self.slot.lock(|slot| slot.get())
    }

    /// The stored metrics, or None before the first publish
    pub fn latest(&self) -> Option<VibrationMetrics> {
        let metrics = self.read();
        metrics.valid.then_some(metrics)
    }
}

impl<M: RawMutex> Default for MetricsStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn reads_invalid_zero_value_before_first_publish() {
        let store = MetricsStore::<NoopRawMutex>::new();

        let metrics = store.read();
        assert!(!metrics.valid);
        assert_eq!(metrics, VibrationMetrics::INVALID);
        assert!(store.latest().is_none());
    }

    #[test]
    fn read_returns_exactly_what_was_published() {
        let store = MetricsStore::<NoopRawMutex>::new();
        let metrics = VibrationMetrics {
            rms_g: 1.25,
            peak_g: 3.5,
            temperature_c: 31.0,
            computed_at_ms: 12_000,
            valid: true,
        };

        store.publish(metrics);
        assert_eq!(store.read(), metrics);
        assert_eq!(store.latest(), Some(metrics));
    }

    #[test]
    fn publish_replaces_the_whole_value() {
        let store = MetricsStore::<NoopRawMutex>::new();
        let first = VibrationMetrics {
            rms_g: 0.9,
            peak_g: 1.1,
            temperature_c: 0.0,
            computed_at_ms: 1000,
            valid: true,
        };
        let second = VibrationMetrics {
            rms_g: 2.0,
            peak_g: 4.0,
            temperature_c: 28.5,
            computed_at_ms: 2000,
            valid: true,
        };

        store.publish(first);
        store.publish(second);
        assert_eq!(store.read(), second);
    }
}
