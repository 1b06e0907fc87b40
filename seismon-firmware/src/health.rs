//! Node health measurement
//!
//! Reads battery voltage and the RP2040 on-die temperature sensor via
//! ADC, and folds in uptime, free heap, and the signal strength cached
//! from the co-processor's link reports.

use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::Instant;

use seismon_core::telemetry::HealthSnapshot;
use seismon_core::traits::HealthSource;

/// ADC reference voltage
const ADC_VREF: f32 = 3.3;

/// 12-bit ADC full scale
const ADC_FULL_SCALE: f32 = 4096.0;

/// Battery sense divider ratio (two equal resistors)
const BATTERY_DIVIDER: f32 = 2.0;

pub struct HealthMonitor {
    adc: Adc<'static, Async>,
    battery: Channel<'static>,
    die_temp: Channel<'static>,
    rssi_dbm: i16,
}

impl HealthMonitor {
    pub fn new(
        adc: Adc<'static, Async>,
        battery: Channel<'static>,
        die_temp: Channel<'static>,
    ) -> Self {
        Self {
            adc,
            battery,
            die_temp,
            rssi_dbm: 0,
        }
    }

    /// Update the cached signal strength from a link report
    pub fn set_rssi(&mut self, rssi_dbm: i16) {
        self.rssi_dbm = rssi_dbm;
    }

    async fn battery_volts(&mut self) -> f32 {
        match self.adc.read(&mut self.battery).await {
            Ok(raw) => raw as f32 * ADC_VREF / ADC_FULL_SCALE * BATTERY_DIVIDER,
            Err(_) => 0.0,
        }
    }

    /// RP2040 datasheet conversion: T = 27 - (V_sense - 0.706) / 0.001721
    async fn die_temp_c(&mut self) -> f32 {
        match self.adc.read(&mut self.die_temp).await {
            Ok(raw) => {
                let volts = raw as f32 * ADC_VREF / ADC_FULL_SCALE;
                27.0 - (volts - 0.706) / 0.001721
            }
            Err(_) => 0.0,
        }
    }
}

impl HealthSource for HealthMonitor {
    async fn snapshot(&mut self) -> HealthSnapshot {
        HealthSnapshot {
            battery_v: self.battery_volts().await,
            temp_c: self.die_temp_c().await,
            rssi_dbm: self.rssi_dbm,
            uptime_sec: Instant::now().as_secs() as u32,
            free_heap: crate::HEAP.free() as u32,
        }
    }
}
