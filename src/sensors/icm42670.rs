//! ICM-42670-P six-axis IMU over I2C.
//!
//! Generic over any `embedded_hal::i2c::I2c` bus so the same driver runs on
//! the ESP-IDF I2C master and on a scripted bus in tests.
//!
//! ## Bring-up
//!
//! 1. Probe WHO_AM_I (expects `0x67`).
//! 2. Accel ±4 g, gyro ±2000 dps, both at 100 Hz.
//! 3. PWR_MGMT0 ← low-noise mode for accel and gyro, then wait for the gyro
//!    to settle.
//!
//! ## Sample
//!
//! One 14-byte burst from TEMP_DATA1: temperature, accel XYZ, gyro XYZ,
//! each a big-endian `i16`.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::ImuSample;
use crate::app::ports::ImuPort;
use crate::error::SensorError;

/// 7-bit address with AP_AD0 tied high.
pub const ICM42670_ADDR: u8 = 0x69;
/// WHO_AM_I value of the -P part.
pub const ICM42670P_ID: u8 = 0x67;

#[allow(dead_code)]
mod regs {
    pub const TEMP_DATA1: u8 = 0x09;
    pub const ACCEL_DATA_X1: u8 = 0x0B;
    pub const GYRO_DATA_X1: u8 = 0x11;
    pub const PWR_MGMT0: u8 = 0x1F;
    pub const GYRO_CONFIG0: u8 = 0x20;
    pub const ACCEL_CONFIG0: u8 = 0x21;
    pub const WHO_AM_I: u8 = 0x75;
}

/// Accel and gyro in low-noise mode.
const PWR_LN_ACCEL_GYRO: u8 = 0x0F;
/// GYRO_FS_SEL = ±2000 dps, ODR = 100 Hz.
const GYRO_2000DPS_100HZ: u8 = 0x09;
/// ACCEL_FS_SEL = ±4 g, ODR = 100 Hz.
const ACCEL_4G_100HZ: u8 = 0x49;
/// Gyro start-up time after leaving sleep.
const GYRO_STARTUP_MS: u32 = 45;

const ACCEL_LSB_PER_G: f32 = 8192.0;
const GYRO_LSB_PER_DPS: f32 = 16.4;
const TEMP_LSB_PER_C: f32 = 128.0;
const TEMP_OFFSET_C: f32 = 25.0;

const BURST_LEN: usize = 14;

pub struct Icm42670<I2C> {
    i2c: I2C,
    address: u8,
    started: bool,
}

impl<I2C: I2c> Icm42670<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, ICM42670_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            started: false,
        }
    }

    /// Probe the part and enable both sensors.
    pub fn start(&mut self, delay: &mut impl DelayNs) -> Result<(), SensorError> {
        let id = self.read_reg(regs::WHO_AM_I)?;
        if id != ICM42670P_ID {
            return Err(SensorError::UnexpectedDevice(id));
        }
        self.write_reg(regs::GYRO_CONFIG0, GYRO_2000DPS_100HZ)?;
        self.write_reg(regs::ACCEL_CONFIG0, ACCEL_4G_100HZ)?;
        self.write_reg(regs::PWR_MGMT0, PWR_LN_ACCEL_GYRO)?;
        delay.delay_ms(GYRO_STARTUP_MS);
        self.started = true;
        Ok(())
    }

    pub fn read(&mut self) -> Result<ImuSample, SensorError> {
        if !self.started {
            return Err(SensorError::NotStarted);
        }
        let mut raw = [0u8; BURST_LEN];
        self.i2c
            .write_read(self.address, &[regs::TEMP_DATA1], &mut raw)
            .map_err(|_| SensorError::Bus)?;
        Ok(decode_burst(&raw))
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|_| SensorError::Bus)
    }
}

impl<I2C: I2c> ImuPort for Icm42670<I2C> {
    fn read_sample(&mut self) -> Result<ImuSample, SensorError> {
        self.read()
    }
}

fn decode_burst(raw: &[u8; BURST_LEN]) -> ImuSample {
    let word = |i: usize| i16::from_be_bytes([raw[i], raw[i + 1]]) as f32;
    ImuSample {
        temperature_c: word(0) / TEMP_LSB_PER_C + TEMP_OFFSET_C,
        ax: word(2) / ACCEL_LSB_PER_G,
        ay: word(4) / ACCEL_LSB_PER_G,
        az: word(6) / ACCEL_LSB_PER_G,
        gx: word(8) / GYRO_LSB_PER_DPS,
        gy: word(10) / GYRO_LSB_PER_DPS,
        gz: word(12) / GYRO_LSB_PER_DPS,
    }
}
