use std::time::Duration;

use crate::drivers::ScopeError;

/// Output data rates, in the order the panel presents them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rate {
    Hz1,
    Hz10,
    Hz25,
    Hz50,
    Hz100,
    Hz200,
    Hz400,
    Hz1344,
    Hz1620,
}

impl Rate {
    pub const ALL: [Rate; 9] = [
        Rate::Hz1,
        Rate::Hz10,
        Rate::Hz25,
        Rate::Hz50,
        Rate::Hz100,
        Rate::Hz200,
        Rate::Hz400,
        Rate::Hz1344,
        Rate::Hz1620,
    ];
    pub const LABELS: [&'static str; 9] = [
        "1Hz", "10Hz", "25Hz", "50Hz", "100Hz", "200Hz", "400Hz", "1344Hz", "1620Hz",
    ];

    pub fn from_index(index: usize) -> Result<Self, ScopeError> {
        lookup("rate", &Self::ALL, index)
    }

    /// ODR field of CTRL_REG1_A. 1620Hz is the low-power-only code 8,
    /// 1344Hz shares code 9 with the 5376Hz low-power rate.
    pub fn odr_bits(self) -> u8 {
        match self {
            Rate::Hz1 => 0b0001,
            Rate::Hz10 => 0b0010,
            Rate::Hz25 => 0b0011,
            Rate::Hz50 => 0b0100,
            Rate::Hz100 => 0b0101,
            Rate::Hz200 => 0b0110,
            Rate::Hz400 => 0b0111,
            Rate::Hz1620 => 0b1000,
            Rate::Hz1344 => 0b1001,
        }
    }

    /// Inter-sample delay used by the synthetic generator.
    pub fn synthetic_period(self) -> Duration {
        let ms = match self {
            Rate::Hz1 => 500,
            Rate::Hz10 => 200,
            Rate::Hz25 => 100,
            Rate::Hz50 => 50,
            Rate::Hz100 => 20,
            Rate::Hz200 => 10,
            Rate::Hz400 => 5,
            Rate::Hz1344 => 2,
            Rate::Hz1620 => 1,
        };
        Duration::from_millis(ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Range {
    G2,
    G4,
    G8,
    G16,
}

impl Range {
    pub const ALL: [Range; 4] = [Range::G2, Range::G4, Range::G8, Range::G16];
    pub const LABELS: [&'static str; 4] = ["2G", "4G", "8G", "16G"];

    pub fn from_index(index: usize) -> Result<Self, ScopeError> {
        lookup("range", &Self::ALL, index)
    }

    /// FS field of CTRL_REG4_A (bits 5:4, unshifted).
    pub fn fs_bits(self) -> u8 {
        match self {
            Range::G2 => 0,
            Range::G4 => 1,
            Range::G8 => 2,
            Range::G16 => 3,
        }
    }

    pub fn synthetic_scale(self) -> f64 {
        match self {
            Range::G2 => 0.625,
            Range::G4 => 1.25,
            Range::G8 => 2.5,
            Range::G16 => 5.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    HighResolution,
    LowPower,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::HighResolution, Mode::LowPower];
    pub const LABELS: [&'static str; 3] = ["NORMAL", "HIRES", "LOWPO"];

    pub fn from_index(index: usize) -> Result<Self, ScopeError> {
        lookup("mode", &Self::ALL, index)
    }

    /// Right shift that turns the left-justified 16-bit output into counts.
    pub fn shift(self) -> u32 {
        match self {
            Mode::Normal => 6,
            Mode::HighResolution => 4,
            Mode::LowPower => 8,
        }
    }

    pub fn synthetic_noise(self) -> f64 {
        match self {
            Mode::Normal => 1.0,
            Mode::HighResolution => 2.0,
            Mode::LowPower => 0.5,
        }
    }
}

fn lookup<T: Copy>(table: &'static str, values: &[T], index: usize) -> Result<T, ScopeError> {
    values.get(index).copied().ok_or(ScopeError::InvalidIndex {
        table,
        index,
        len: values.len(),
    })
}

/// Authoritative acquisition parameters, owned by the sampler thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcquisitionSettings {
    pub rate: Rate,
    pub range: Range,
    pub mode: Mode,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            rate: Rate::Hz1620,
            range: Range::G16,
            mode: Mode::Normal,
        }
    }
}

impl AcquisitionSettings {
    pub fn from_indices(rate: usize, range: usize, mode: usize) -> Result<Self, ScopeError> {
        Ok(Self {
            rate: Rate::from_index(rate)?,
            range: Range::from_index(range)?,
            mode: Mode::from_index(mode)?,
        })
    }

    /// Resolve a command against the tables. `Shutdown` yields `None`.
    pub fn with_command(self, cmd: ControlCommand) -> Result<Option<Self>, ScopeError> {
        let next = match cmd {
            ControlCommand::Rate(idx) => Self {
                rate: Rate::from_index(idx)?,
                ..self
            },
            ControlCommand::Range(idx) => Self {
                range: Range::from_index(idx)?,
                ..self
            },
            ControlCommand::Mode(idx) => Self {
                mode: Mode::from_index(idx)?,
                ..self
            },
            ControlCommand::Shutdown => return Ok(None),
        };
        Ok(Some(next))
    }
}

/// Parameter changes sent from the UI thread to the sampler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    Rate(usize),
    Range(usize),
    Mode(usize),
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_line_up_with_tables() {
        assert_eq!(Rate::ALL.len(), Rate::LABELS.len());
        assert_eq!(Range::ALL.len(), Range::LABELS.len());
        assert_eq!(Mode::ALL.len(), Mode::LABELS.len());
        assert_eq!(Rate::LABELS[8], "1620Hz");
        assert_eq!(Range::LABELS[3], "16G");
    }

    #[test]
    fn out_of_table_index_is_rejected() {
        let err = Rate::from_index(9).unwrap_err();
        assert!(matches!(
            err,
            ScopeError::InvalidIndex {
                table: "rate",
                index: 9,
                len: 9
            }
        ));
        assert!(Mode::from_index(3).is_err());
    }

    #[test]
    fn commands_update_one_field() {
        let base = AcquisitionSettings::default();
        let next = base.with_command(ControlCommand::Range(0)).unwrap().unwrap();
        assert_eq!(next.range, Range::G2);
        assert_eq!(next.rate, base.rate);
        assert_eq!(next.mode, base.mode);
        assert!(base.with_command(ControlCommand::Shutdown).unwrap().is_none());
        assert!(base.with_command(ControlCommand::Mode(7)).is_err());
    }

    #[test]
    fn synthetic_tables_match_reference_values() {
        assert_eq!(Rate::Hz1.synthetic_period(), Duration::from_millis(500));
        assert_eq!(Rate::Hz1620.synthetic_period(), Duration::from_millis(1));
        assert_eq!(Range::G16.synthetic_scale(), 5.0);
        assert_eq!(Mode::LowPower.synthetic_noise(), 0.5);
    }
}
