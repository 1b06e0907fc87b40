//! Network Co-Processor Communication Protocol
//!
//! This crate defines the UART-based protocol between the sensor MCU and
//! the network co-processor that owns WiFi, TLS, and MQTT. The MCU issues
//! link/session/publish requests; the co-processor answers with
//! acknowledgements and status reports.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌──────┬────────┬──────┬─────────────┬──────────┐
//! │ SYNC │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B   │ 1B     │ 1B   │ 0–200B      │ 1B       │
//! └──────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The co-processor is a "dumb pipe" for transport: connection policy,
//! retry, and telemetry cadence all stay on the MCU.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_SYNC, MAX_FRAME_LEN, MAX_PAYLOAD_LEN};
pub use messages::{HostMessage, MessageError, ModemMessage, DEVICE_ID_LEN};
