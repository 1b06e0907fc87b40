//! Device-health source trait

use crate::telemetry::HealthSnapshot;

/// Supplier of the device-health snapshot attached to telemetry reports
///
/// Health values (battery, temperature, memory, uptime) are read-only
/// inputs to the telemetry cycle, not computed by the core.
pub trait HealthSource {
    async fn snapshot(&mut self) -> HealthSnapshot;
}
