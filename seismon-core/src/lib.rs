//! Board-agnostic core logic for the Seismon vibration monitor
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Capability traits (motion sensor, network control, publish, health)
//! - Fixed-capacity sample window and RMS/peak reduction
//! - Mutex-guarded single-slot metrics store
//! - Connectivity state machine and supervisor
//! - Fixed-interval telemetry cycle and report model
//! - Build-time configuration constants

#![no_std]
#![deny(unsafe_code)]
#![allow(async_fn_in_trait)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod connectivity;
pub mod metrics;
pub mod telemetry;
pub mod traits;
pub mod window;
