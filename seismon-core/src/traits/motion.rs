//! Motion sensor trait

use crate::window::Sample;

/// Errors that can occur when talking to the motion sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Bus transfer failed
    Bus,
    /// Identity register did not match the expected part
    BadIdentity,
}

/// Trait for pull-based tri-axis motion sensors
///
/// Implementations wrap the concrete IMU. One poll yields at most one
/// sample; the core keeps no buffering beyond its own window.
pub trait MotionSensor {
    /// Poll for one fresh sample
    ///
    /// Returns `Ok(None)` when the sensor has no new data this tick.
    fn poll_sample(&mut self) -> Result<Option<Sample>, MotionError>;

    /// Sensor die temperature in °C, if the part exposes one
    fn temperature_c(&mut self) -> Option<f32> {
        None
    }
}
