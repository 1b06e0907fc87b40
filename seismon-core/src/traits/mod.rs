//! Capability traits
//!
//! These traits define the seams between the core logic and its external
//! collaborators: the motion sensor, the network co-processor, and the
//! device-health sources.

pub mod health;
pub mod motion;
pub mod network;

pub use health::HealthSource;
pub use motion::{MotionError, MotionSensor};
pub use network::{NetworkControl, Publish, PublishError};
