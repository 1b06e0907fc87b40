//! Accelerometer drivers

pub mod lis3dh;

pub use lis3dh::{ImuBus, Lis3dh};
