//! Connectivity and telemetry control task
//!
//! Single 100 ms loop that owns the modem client. Each tick advances
//! the connectivity state machine one step, refreshes the health
//! snapshot, and gives the telemetry cycle a chance to publish.

#[cfg(feature = "defmt")]
use defmt::*;
use embassy_time::{Duration, Instant, Ticker};
use heapless::String;

use seismon_core::config::{CONTROL_TICK_MS, TELEMETRY_INTERVAL_MS};
use seismon_core::connectivity::ConnectivitySupervisor;
use seismon_core::telemetry::{CycleOutcome, TelemetryCycle};
use seismon_core::traits::HealthSource;
use seismon_protocol::DEVICE_ID_LEN;

use crate::channels::{StatusSnapshot, METRICS, STATUS};
use crate::health::HealthMonitor;
use crate::net::ModemClient;

/// Control task - drives connectivity and the publish cadence
#[embassy_executor::task]
pub async fn control_task(mut net: ModemClient, mut health: HealthMonitor) {
    #[cfg(feature = "defmt")]
    info!("Control task started");

    let mut supervisor = ConnectivitySupervisor::new();
    let mut cycle = TelemetryCycle::new(TELEMETRY_INTERVAL_MS);
    let mut ticker = Ticker::every(Duration::from_millis(CONTROL_TICK_MS));

    #[cfg(feature = "defmt")]
    let mut last_state = supervisor.state();

    loop {
        ticker.next().await;

        let now_ms = Instant::now().as_millis();
        let state = supervisor.poll(&mut net, now_ms).await;

        #[cfg(feature = "defmt")]
        if state != last_state {
            info!("Connectivity: {:?} -> {:?}", last_state, state);
            last_state = state;
        }

        health.set_rssi(net.rssi_dbm());
        let snapshot = health.snapshot().await;

        // The id and timestamp are copied out so the publish call can
        // borrow the client mutably
        let device_id: String<DEVICE_ID_LEN> = String::try_from(net.device_id())
            .unwrap_or_else(|_| String::new());
        let timestamp = net.epoch_seconds();

        let outcome = cycle
            .poll(
                now_ms,
                supervisor.is_ready(),
                &device_id,
                timestamp,
                &METRICS,
                &snapshot,
                &mut net,
            )
            .await;

        match outcome {
            CycleOutcome::Idle => {}
            CycleOutcome::Published => {
                #[cfg(feature = "defmt")]
                info!("Telemetry published ({} total)", cycle.published_count());
            }
            CycleOutcome::SkippedNotReady => {
                #[cfg(feature = "defmt")]
                debug!("Telemetry skipped: not connected");
            }
            CycleOutcome::SkippedNoMetrics => {
                #[cfg(feature = "defmt")]
                debug!("Telemetry skipped: no metrics yet");
            }
            CycleOutcome::PublishFailed(_e) => {
                #[cfg(feature = "defmt")]
                warn!("Telemetry publish failed: {:?}", _e);
            }
        }

        STATUS.signal(StatusSnapshot {
            state,
            rssi_dbm: net.rssi_dbm(),
            published: cycle.published_count(),
        });
    }
}
