//! Telemetry report model and fixed-interval publish cycle
//!
//! A [`TelemetryReport`] is a read-only projection of device identity, the
//! latest vibration metrics, and a device-health snapshot. It is built
//! fresh per publish attempt and discarded afterwards. The
//! [`TelemetryCycle`] fires on a fixed interval and only publishes when the
//! connectivity supervisor reports ready and valid metrics exist.

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;
use serde::Serialize;

use crate::config;
use crate::metrics::{MetricsStore, VibrationMetrics};
use crate::traits::{Publish, PublishError};

/// Capacity of the telemetry topic string
pub const TOPIC_CAPACITY: usize = 64;

/// Capacity of the encoded report payload
pub const PAYLOAD_CAPACITY: usize = 160;

/// Device-health snapshot supplied by external collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HealthSnapshot {
    /// Battery voltage in volts
    pub battery_v: f32,
    /// Board/internal temperature in °C
    pub temp_c: f32,
    /// Link signal strength in dBm, 0 when the link is down
    pub rssi_dbm: i16,
    /// Seconds since boot
    pub uptime_sec: u32,
    /// Free heap bytes
    pub free_heap: u32,
}

impl HealthSnapshot {
    pub const ZERO: Self = Self {
        battery_v: 0.0,
        temp_c: 0.0,
        rssi_dbm: 0,
        uptime_sec: 0,
        free_heap: 0,
    };
}

/// Vibration section of a report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VibrationSummary {
    pub rms_g: f32,
    pub peak_g: f32,
}

/// Health section of a report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HealthSection {
    pub battery_v: f32,
    pub temp_c: f32,
    pub rssi_dbm: i16,
    pub uptime_sec: u32,
    pub free_heap: u32,
    /// IMU die temperature, absent when the sensor reports none
    pub imu_temp_c: Option<f32>,
}

/// One telemetry report, built fresh per publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryReport<'a> {
    pub device_id: &'a str,
    /// Wall-clock seconds from the network collaborator
    pub timestamp: u64,
    pub vibration: VibrationSummary,
    pub health: HealthSection,
}

impl<'a> TelemetryReport<'a> {
    pub fn new(
        device_id: &'a str,
        timestamp: u64,
        metrics: &VibrationMetrics,
        health: &HealthSnapshot,
    ) -> Self {
        // Absent-as-zero: an exactly-zero IMU temperature means "no reading"
        let imu_temp_c = (metrics.temperature_c != 0.0).then_some(metrics.temperature_c);

        Self {
            device_id,
            timestamp,
            vibration: VibrationSummary {
                rms_g: metrics.rms_g,
                peak_g: metrics.peak_g,
            },
            health: HealthSection {
                battery_v: health.battery_v,
                temp_c: health.temp_c,
                rssi_dbm: health.rssi_dbm,
                uptime_sec: health.uptime_sec,
                free_heap: health.free_heap,
                imu_temp_c,
            },
        }
    }
}

/// Telemetry topic for a device: `<prefix>/<device-id>/telemetry`
pub fn telemetry_topic(device_id: &str) -> Result<String<TOPIC_CAPACITY>, PublishError> {
    let mut topic = String::new();
    write!(topic, "{}/{}/telemetry", config::TOPIC_PREFIX, device_id)
        .map_err(|_| PublishError::Encoding)?;
    Ok(topic)
}

/// What one telemetry tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Interval has not elapsed yet
    Idle,
    /// Interval fired but the supervisor is not ready
    SkippedNotReady,
    /// Interval fired but no window has completed yet
    SkippedNoMetrics,
    /// Report handed to the publish capability
    Published,
    /// Publish attempt failed; retried at the next interval
    PublishFailed(PublishError),
}

/// Fixed-interval driver for telemetry publishing
///
/// The interval timer resets on every attempt (interval boundary), never
/// on success, so a failed or skipped cycle does not shift the cadence.
pub struct TelemetryCycle {
    interval_ms: u64,
    last_attempt_ms: u64,
    published: u32,
}

impl TelemetryCycle {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_attempt_ms: 0,
            published: 0,
        }
    }

    /// Number of successfully published reports
    pub fn published_count(&self) -> u32 {
        self.published
    }

    /// Run one telemetry tick
    ///
    /// `ready` is the supervisor's publish predicate; `timestamp` is the
    /// wall-clock value stamped into the report.
    #[allow(clippy::too_many_arguments)]
    pub async fn poll<M: RawMutex, P: Publish>(
        &mut self,
        now_ms: u64,
        ready: bool,
        device_id: &str,
        timestamp: u64,
        store: &MetricsStore<M>,
        health: &HealthSnapshot,
        publisher: &mut P,
    ) -> CycleOutcome {
        if now_ms.saturating_sub(self.last_attempt_ms) < self.interval_ms {
            return CycleOutcome::Idle;
        }
        self.last_attempt_ms = now_ms;

        if !ready {
            return CycleOutcome::SkippedNotReady;
        }

        let metrics = store.read();
        if !metrics.valid {
            return CycleOutcome::SkippedNoMetrics;
        }

        let report = TelemetryReport::new(device_id, timestamp, &metrics, health);
        match self.publish_report(&report, publisher).await {
            Ok(()) => {
                self.published += 1;
                CycleOutcome::Published
            }
            Err(e) => CycleOutcome::PublishFailed(e),
        }
    }

    async fn publish_report<P: Publish>(
        &mut self,
        report: &TelemetryReport<'_>,
        publisher: &mut P,
    ) -> Result<(), PublishError> {
        let topic = telemetry_topic(report.device_id)?;

        let mut buf = [0u8; PAYLOAD_CAPACITY];
        let payload =
            postcard::to_slice(report, &mut buf).map_err(|_| PublishError::Encoding)?;

        publisher.publish(topic.as_str(), payload).await
    }
}
