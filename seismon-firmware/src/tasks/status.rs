//! Periodic status reporting task
//!
//! Consumes the control task's status signal and emits a throttled log
//! line so the RTT stream shows liveness without flooding.

#[cfg(feature = "defmt")]
use defmt::*;
use embassy_time::{Duration, Ticker};

use seismon_core::config::STATUS_INTERVAL_MS;

use crate::channels::{samples_taken, METRICS, STATUS};

/// Status task - periodic node state log line
#[embassy_executor::task]
pub async fn status_task() {
    #[cfg(feature = "defmt")]
    info!("Status task started");

    let mut ticker = Ticker::every(Duration::from_millis(STATUS_INTERVAL_MS));

    loop {
        ticker.next().await;

        if let Some(_snapshot) = STATUS.try_take() {
            #[cfg(feature = "defmt")]
            info!(
                "Status: {:?} rssi={}dBm published={} samples={}",
                _snapshot.state, _snapshot.rssi_dbm, _snapshot.published, samples_taken()
            );

            #[cfg(feature = "defmt")]
            if let Some(metrics) = METRICS.latest() {
                info!(
                    "Vibration: rms={}g peak={}g",
                    metrics.rms_g, metrics.peak_g
                );
            }
        }
    }
}
