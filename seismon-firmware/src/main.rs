//! Seismon - Vibration Monitoring Sensor Node Firmware
//!
//! RP2040 firmware for a fixed-installation vibration sensor. An
//! LIS3DH accelerometer is sampled at 500 Hz, each one-second window
//! is reduced to RMS/peak metrics, and a UART-attached network
//! co-processor carries the five-second telemetry reports to the
//! broker.

#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel as AdcChannel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Pull;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};

use crate::net::ModemClient;

mod channels;
mod health;
mod imu;
mod net;
mod tasks;

/// Heap allocator, kept only so health reports can include free space
#[global_allocator]
pub static HEAP: Heap = Heap::empty();

const HEAP_SIZE: usize = 16 * 1024;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    info!("Seismon firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());

    // UART0 to the network co-processor, 115200 baud default
    let uart_config = UartConfig::default();
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let net = ModemClient::new(uart);

    #[cfg(feature = "defmt")]
    info!("Modem UART initialized");

    // I2C0 to the accelerometer (SDA=GPIO4, SCL=GPIO5)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let accel = imu::board_imu(i2c);

    #[cfg(feature = "defmt")]
    info!("Accelerometer I2C initialized");

    // ADC for battery sense (GPIO26) and the on-die temperature sensor
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let battery = AdcChannel::new_pin(p.PIN_26, Pull::None);
    let die_temp = AdcChannel::new_temp_sensor(p.ADC_TEMP_SENSOR);
    let health = health::HealthMonitor::new(adc, battery, die_temp);

    #[cfg(feature = "defmt")]
    info!("ADC initialized");

    spawner.spawn(tasks::sampler_task(accel)).unwrap();
    spawner.spawn(tasks::control_task(net, health)).unwrap();
    spawner.spawn(tasks::status_task()).unwrap();

    #[cfg(feature = "defmt")]
    info!("All tasks spawned, node running");

    // All work happens in the spawned tasks
    loop {
        Timer::after_secs(60).await;
        #[cfg(feature = "defmt")]
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
