//! LIS3DH tri-axis accelerometer
//!
//! Configured for high-resolution ±2 g operation with the internal data
//! rate above the 500 Hz sampling tick, so a data-ready poll almost always
//! yields a fresh sample. The auxiliary ADC provides an uncalibrated die
//! temperature.

use seismon_core::traits::{MotionError, MotionSensor};
use seismon_core::window::Sample;

const REG_WHO_AM_I: u8 = 0x0F;
const REG_TEMP_CFG: u8 = 0x1F;
const REG_CTRL1: u8 = 0x20;
const REG_CTRL4: u8 = 0x23;
const REG_STATUS: u8 = 0x27;
const REG_OUT_X_L: u8 = 0x28;
const REG_OUT_ADC3_L: u8 = 0x0C;

/// Multi-byte reads need the auto-increment bit set on the start address
const AUTO_INCREMENT: u8 = 0x80;

/// WHO_AM_I value for the LIS3DH
const DEVICE_ID: u8 = 0x33;

/// ODR 1.344 kHz, X/Y/Z enabled
const CTRL1_ODR_1344HZ_XYZ: u8 = 0x97;
/// Block data update + high-resolution mode, ±2 g full scale
const CTRL4_BDU_HR_2G: u8 = 0x88;
/// Auxiliary ADC and temperature sensor enabled
const TEMP_CFG_ADC_TEMP_EN: u8 = 0xC0;

/// New X/Y/Z data available
const STATUS_ZYXDA: u8 = 0x08;

/// Sensitivity in high-resolution ±2 g mode: 1 mg per digit
const MG_PER_DIGIT: f32 = 0.001;

/// Register access trait for platform abstraction
pub trait ImuBus {
    #[allow(clippy::result_unit_err)]
    fn read_reg(&mut self, reg: u8) -> Result<u8, ()>;

    #[allow(clippy::result_unit_err)]
    fn read_regs(&mut self, start_reg: u8, buf: &mut [u8]) -> Result<(), ()>;

    #[allow(clippy::result_unit_err)]
    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), ()>;
}

/// LIS3DH accelerometer over a register bus
pub struct Lis3dh<BUS> {
    bus: BUS,
}

impl<BUS: ImuBus> Lis3dh<BUS> {
    pub fn new(bus: BUS) -> Self {
        Self { bus }
    }

    /// Probe the part and configure sampling
    pub fn init(&mut self) -> Result<(), MotionError> {
        let id = self.bus.read_reg(REG_WHO_AM_I).map_err(|_| MotionError::Bus)?;
        if id != DEVICE_ID {
            return Err(MotionError::BadIdentity);
        }

        self.bus
            .write_reg(REG_CTRL1, CTRL1_ODR_1344HZ_XYZ)
            .map_err(|_| MotionError::Bus)?;
        self.bus
            .write_reg(REG_CTRL4, CTRL4_BDU_HR_2G)
            .map_err(|_| MotionError::Bus)?;
        self.bus
            .write_reg(REG_TEMP_CFG, TEMP_CFG_ADC_TEMP_EN)
            .map_err(|_| MotionError::Bus)?;

        Ok(())
    }

    /// Convert a raw left-justified 12-bit reading to g
    fn raw_to_g(raw: i16) -> f32 {
        (raw >> 4) as f32 * MG_PER_DIGIT
    }
}

impl<BUS: ImuBus> MotionSensor for Lis3dh<BUS> {
    fn poll_sample(&mut self) -> Result<Option<Sample>, MotionError> {
        let status = self.bus.read_reg(REG_STATUS).map_err(|_| MotionError::Bus)?;
        if status & STATUS_ZYXDA == 0 {
            return Ok(None);
        }

        let mut raw = [0u8; 6];
        self.bus
            .read_regs(REG_OUT_X_L | AUTO_INCREMENT, &mut raw)
            .map_err(|_| MotionError::Bus)?;

        let x = i16::from_le_bytes([raw[0], raw[1]]);
        let y = i16::from_le_bytes([raw[2], raw[3]]);
        let z = i16::from_le_bytes([raw[4], raw[5]]);

        Ok(Some(Sample::new(
            Self::raw_to_g(x),
            Self::raw_to_g(y),
            Self::raw_to_g(z),
        )))
    }

    fn temperature_c(&mut self) -> Option<f32> {
        let mut raw = [0u8; 2];
        self.bus
            .read_regs(REG_OUT_ADC3_L | AUTO_INCREMENT, &mut raw)
            .ok()?;

        // Die temperature: 1 °C/LSB in the high byte, offset around 25 °C
        let delta = raw[1] as i8;
        Some(25.0 + f32::from(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted register bus
    struct FakeBus {
        who_am_i: u8,
        status: u8,
        out: [u8; 6],
        adc3: [u8; 2],
        writes: [(u8, u8); 8],
        write_count: usize,
    }

    impl FakeBus {
        fn new() -> Self {
            Self {
                who_am_i: DEVICE_ID,
                status: STATUS_ZYXDA,
                out: [0; 6],
                adc3: [0; 2],
                writes: [(0, 0); 8],
                write_count: 0,
            }
        }

        /// Load a left-justified 12-bit reading per axis (in raw digits)
        fn set_raw(&mut self, x: i16, y: i16, z: i16) {
            let encode = |v: i16| ((v << 4) as u16).to_le_bytes();
            let [xl, xh] = encode(x);
            let [yl, yh] = encode(y);
            let [zl, zh] = encode(z);
            self.out = [xl, xh, yl, yh, zl, zh];
        }
    }

    impl ImuBus for FakeBus {
        fn read_reg(&mut self, reg: u8) -> Result<u8, ()> {
            match reg {
                REG_WHO_AM_I => Ok(self.who_am_i),
                REG_STATUS => Ok(self.status),
                _ => Err(()),
            }
        }

        fn read_regs(&mut self, start_reg: u8, buf: &mut [u8]) -> Result<(), ()> {
            match start_reg & !AUTO_INCREMENT {
                REG_OUT_X_L => {
                    buf.copy_from_slice(&self.out);
                    Ok(())
                }
                REG_OUT_ADC3_L => {
                    buf.copy_from_slice(&self.adc3);
                    Ok(())
                }
                _ => Err(()),
            }
        }

        fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), ()> {
            self.writes[self.write_count] = (reg, value);
            self.write_count += 1;
            Ok(())
        }
    }

    #[test]
    fn init_configures_sampling() {
        let mut imu = Lis3dh::new(FakeBus::new());
        imu.init().unwrap();

        assert_eq!(imu.bus.writes[0], (REG_CTRL1, CTRL1_ODR_1344HZ_XYZ));
        assert_eq!(imu.bus.writes[1], (REG_CTRL4, CTRL4_BDU_HR_2G));
        assert_eq!(imu.bus.writes[2], (REG_TEMP_CFG, TEMP_CFG_ADC_TEMP_EN));
    }

    #[test]
    fn init_rejects_wrong_identity() {
        let mut bus = FakeBus::new();
        bus.who_am_i = 0x44;
        let mut imu = Lis3dh::new(bus);

        assert_eq!(imu.init(), Err(MotionError::BadIdentity));
    }

    #[test]
    fn poll_yields_scaled_sample_when_data_ready() {
        let mut bus = FakeBus::new();
        // 1000 digits = 1.000 g in HR ±2 g mode
        bus.set_raw(1000, -500, 250);
        let mut imu = Lis3dh::new(bus);

        let sample = imu.poll_sample().unwrap().unwrap();
        assert!((sample.x - 1.0).abs() < 1e-6);
        assert!((sample.y + 0.5).abs() < 1e-6);
        assert!((sample.z - 0.25).abs() < 1e-6);
    }

    #[test]
    fn poll_yields_none_without_fresh_data() {
        let mut bus = FakeBus::new();
        bus.status = 0;
        let mut imu = Lis3dh::new(bus);

        assert_eq!(imu.poll_sample(), Ok(None));
    }

    #[test]
    fn temperature_offsets_from_25c() {
        let mut bus = FakeBus::new();
        bus.adc3 = [0, 5u8];
        let mut imu = Lis3dh::new(bus);

        assert_eq!(imu.temperature_c(), Some(30.0));

        imu.bus.adc3 = [0, (-10i8) as u8];
        assert_eq!(imu.temperature_c(), Some(15.0));
    }
}
