//! Hardware drivers for the Seismon sensor node
//!
//! Drivers are generic over small platform-abstraction traits so they can
//! be exercised on the host with scripted buses.

#![no_std]
#![deny(unsafe_code)]

pub mod imu;
