//! Accelerometer sampling task
//!
//! Polls the accelerometer on a fixed 500 Hz schedule. The ticker keeps
//! absolute deadlines, so a slow iteration shortens the next wait
//! instead of drifting the whole schedule. Each full one-second window
//! is reduced in place and the result published to the metrics store.

#[cfg(feature = "defmt")]
use defmt::*;
use embassy_time::{Duration, Instant, Ticker, Timer};

use seismon_core::config::{SAMPLE_PERIOD_US, WINDOW_SAMPLES};
use seismon_core::metrics::VibrationMetrics;
use seismon_core::traits::MotionSensor;
use seismon_core::window::SampleWindow;

use crate::channels::{self, METRICS};
use crate::imu::BoardImu;

/// Retry delay when the accelerometer fails to initialize
const INIT_RETRY_MS: u64 = 1000;

/// Sampler task - fixed-rate acquisition and window reduction
#[embassy_executor::task]
pub async fn sampler_task(mut imu: BoardImu) {
    #[cfg(feature = "defmt")]
    info!("Sampler task started");

    // The node is useless without its sensor; keep retrying
    loop {
        match imu.init() {
            Ok(()) => break,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                warn!("Accelerometer init failed: {:?}, retrying", _e);
                Timer::after_millis(INIT_RETRY_MS).await;
            }
        }
    }

    #[cfg(feature = "defmt")]
    info!("Accelerometer online");

    let mut window = SampleWindow::<WINDOW_SAMPLES>::new();
    let mut ticker = Ticker::every(Duration::from_micros(SAMPLE_PERIOD_US));

    loop {
        ticker.next().await;

        let sample = match imu.poll_sample() {
            Ok(Some(sample)) => sample,
            // No new data ready at this deadline
            Ok(None) => continue,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                warn!("Sample read failed: {:?}", _e);
                continue;
            }
        };

        channels::count_sample();

        if window.push(sample).is_err() {
            // Reduction below keeps the window from ever filling between
            // pushes; dropping the sample here is the safe fallback
            continue;
        }

        if window.is_full() {
            match window.reduce() {
                Ok(summary) => {
                    METRICS.publish(VibrationMetrics {
                        rms_g: summary.rms_g,
                        peak_g: summary.peak_g,
                        temperature_c: imu.temperature_c().unwrap_or(0.0),
                        computed_at_ms: Instant::now().as_millis(),
                        valid: true,
                    });

                    #[cfg(feature = "defmt")]
                    debug!(
                        "Window reduced: rms={} peak={}",
                        summary.rms_g, summary.peak_g
                    );
                }
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    warn!("Window reduction failed: {:?}", _e);
                }
            }
        }
    }
}
