// LSM303 (DLHC/AGR) accelerometer on any embedded-hal i2c bus.
use embedded_hal::i2c::I2c;

use crate::drivers::params::{Mode, Range, Rate};
use crate::drivers::ScopeError;

pub const ADDRESS: u8 = 0x19;
const WHO_AM_I_A: u8 = 0x0F;
const DEVICE_ID: u8 = 0x33;
const CTRL_REG1_A: u8 = 0x20;
const CTRL_REG4_A: u8 = 0x23;
const OUT_X_L_A: u8 = 0x28;
// MSB of the sub-address enables auto-increment for multi-byte reads.
const AUTO_INCREMENT: u8 = 0x80;

const REG1_XYZ_EN: u8 = 0b0000_0111;
const REG1_LPEN: u8 = 0b0000_1000;
const REG4_HR: u8 = 0b0000_1000;
const REG4_FS_MASK: u8 = 0b0011_0000;

const STANDARD_GRAVITY: f64 = 9.80665;

fn bus_error<E: embedded_hal::i2c::Error>(err: E) -> ScopeError {
    ScopeError::Bus(err.kind())
}

/// Handle to a physical 3-axis sensor.
pub trait Accelerometer {
    fn set_rate(&mut self, rate: Rate) -> Result<(), ScopeError>;
    fn set_range(&mut self, range: Range) -> Result<(), ScopeError>;
    fn set_mode(&mut self, mode: Mode) -> Result<(), ScopeError>;
    /// Acceleration in m/s² for x, y, z.
    fn read(&mut self) -> Result<(f64, f64, f64), ScopeError>;
}

impl<A: Accelerometer + ?Sized> Accelerometer for Box<A> {
    fn set_rate(&mut self, rate: Rate) -> Result<(), ScopeError> {
        (**self).set_rate(rate)
    }

    fn set_range(&mut self, range: Range) -> Result<(), ScopeError> {
        (**self).set_range(range)
    }

    fn set_mode(&mut self, mode: Mode) -> Result<(), ScopeError> {
        (**self).set_mode(mode)
    }

    fn read(&mut self) -> Result<(f64, f64, f64), ScopeError> {
        (**self).read()
    }
}

pub struct Lsm303<I> {
    i2c: I,
    range: Range,
    mode: Mode,
}

impl<I: I2c> Lsm303<I> {
    /// Check the device id and enable all three axes.
    pub fn new(i2c: I) -> Result<Self, ScopeError> {
        let mut sensor = Self {
            i2c,
            range: Range::G2,
            mode: Mode::Normal,
        };
        let id = sensor.read_register(WHO_AM_I_A)?;
        if id != DEVICE_ID {
            return Err(ScopeError::UnexpectedDevice {
                expected: DEVICE_ID,
                actual: id,
            });
        }
        let reg1 = sensor.read_register(CTRL_REG1_A)?;
        sensor.write_register(CTRL_REG1_A, reg1 | REG1_XYZ_EN)?;
        sensor.range = sensor.read_range()?;
        Ok(sensor)
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, ScopeError> {
        let mut value = [0u8];
        self.i2c
            .write_read(ADDRESS, &[reg], &mut value)
            .map_err(bus_error)?;
        Ok(value[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), ScopeError> {
        self.i2c.write(ADDRESS, &[reg, value]).map_err(bus_error)
    }

    fn read_range(&mut self) -> Result<Range, ScopeError> {
        let reg4 = self.read_register(CTRL_REG4_A)?;
        Range::from_index(((reg4 & REG4_FS_MASK) >> 4) as usize)
    }

    fn update_register(&mut self, reg: u8, mask: u8, bits: u8) -> Result<(), ScopeError> {
        let current = self.read_register(reg)?;
        self.write_register(reg, (current & !mask) | (bits & mask))
    }

    /// mg per count for the current range and mode.
    fn lsb_mg(&self) -> f64 {
        let table = match self.mode {
            Mode::Normal => [3.9, 7.82, 15.63, 46.9],
            Mode::HighResolution => [0.98, 1.95, 3.9, 11.72],
            Mode::LowPower => [15.63, 31.26, 62.52, 187.58],
        };
        table[self.range.fs_bits() as usize]
    }
}

impl<I: I2c> Accelerometer for Lsm303<I> {
    fn set_rate(&mut self, rate: Rate) -> Result<(), ScopeError> {
        self.update_register(CTRL_REG1_A, 0xF0, rate.odr_bits() << 4)
    }

    fn set_range(&mut self, range: Range) -> Result<(), ScopeError> {
        self.update_register(CTRL_REG4_A, REG4_FS_MASK, range.fs_bits() << 4)?;
        self.range = range;
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) -> Result<(), ScopeError> {
        let (lpen, hr) = match mode {
            Mode::Normal => (0, 0),
            Mode::HighResolution => (0, REG4_HR),
            Mode::LowPower => (REG1_LPEN, 0),
        };
        self.update_register(CTRL_REG1_A, REG1_LPEN, lpen)?;
        self.update_register(CTRL_REG4_A, REG4_HR, hr)?;
        self.mode = mode;
        Ok(())
    }

    fn read(&mut self) -> Result<(f64, f64, f64), ScopeError> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(ADDRESS, &[OUT_X_L_A | AUTO_INCREMENT], &mut raw)
            .map_err(bus_error)?;
        let shift = self.mode.shift();
        let scale = self.lsb_mg() * 0.001 * STANDARD_GRAVITY;
        let axis = |lo: u8, hi: u8| ((i16::from_le_bytes([lo, hi]) >> shift) as f64) * scale;
        Ok((
            axis(raw[0], raw[1]),
            axis(raw[2], raw[3]),
            axis(raw[4], raw[5]),
        ))
    }
}
