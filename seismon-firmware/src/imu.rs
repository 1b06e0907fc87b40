//! Board accelerometer wiring
//!
//! Binds the LIS3DH driver to the RP2040's blocking I2C peripheral.

use embassy_rp::i2c::{Blocking, I2c};

use seismon_drivers::imu::{ImuBus, Lis3dh};

/// LIS3DH I2C address with SA0 tied low
const LIS3DH_ADDR: u8 = 0x18;

/// LIS3DH attached to I2C0
pub type BoardImu = Lis3dh<I2cBus>;

/// I2C register access for the accelerometer
pub struct I2cBus {
    i2c: I2c<'static, Blocking>,
}

impl I2cBus {
    pub fn new(i2c: I2c<'static, Blocking>) -> Self {
        Self { i2c }
    }
}

impl ImuBus for I2cBus {
    fn read_reg(&mut self, reg: u8) -> Result<u8, ()> {
        let mut buf = [0u8; 1];
        self.i2c
            .blocking_write_read(LIS3DH_ADDR, &[reg], &mut buf)
            .map_err(|_| ())?;
        Ok(buf[0])
    }

    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), ()> {
        self.i2c
            .blocking_write_read(LIS3DH_ADDR, &[reg], buf)
            .map_err(|_| ())
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), ()> {
        self.i2c
            .blocking_write(LIS3DH_ADDR, &[reg, value])
            .map_err(|_| ())
    }
}

/// Build the board accelerometer from a configured I2C peripheral
pub fn board_imu(i2c: I2c<'static, Blocking>) -> BoardImu {
    Lis3dh::new(I2cBus::new(i2c))
}
