//! Sensor configuration types
//!
//! Gain, integration timing and the precision presets that bundle timing with
//! the data-ready timeout.

/// Spectral engine gain (`AGAIN` field of CFG1)
///
/// The discriminant is the 5-bit register code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// 0.5x
    X0_5 = 0,
    /// 1x
    X1 = 1,
    /// 2x
    X2 = 2,
    /// 4x
    X4 = 3,
    /// 8x
    X8 = 4,
    /// 16x (power-on default used by `init()`)
    X16 = 5,
    /// 32x
    X32 = 6,
    /// 64x
    X64 = 7,
    /// 128x
    X128 = 8,
    /// 256x
    X256 = 9,
    /// 512x
    X512 = 10,
    /// 1024x
    X1024 = 11,
    /// 2048x (most sensitive)
    X2048 = 12,
}

impl Gain {
    /// Mask of the gain field inside CFG1
    pub const FIELD_MASK: u8 = 0x1F;

    /// Register code written to `AGAIN`
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a register code, `None` for reserved codes (13-31)
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & Self::FIELD_MASK {
            0 => Some(Self::X0_5),
            1 => Some(Self::X1),
            2 => Some(Self::X2),
            3 => Some(Self::X4),
            4 => Some(Self::X8),
            5 => Some(Self::X16),
            6 => Some(Self::X32),
            7 => Some(Self::X64),
            8 => Some(Self::X128),
            9 => Some(Self::X256),
            10 => Some(Self::X512),
            11 => Some(Self::X1024),
            12 => Some(Self::X2048),
            _ => None,
        }
    }

    /// Multiplier as a float (0.5 ... 2048.0)
    #[must_use]
    pub fn multiplier(self) -> f32 {
        match self {
            Self::X0_5 => 0.5,
            other => f32::from(1u16 << (other as u8 - 1)),
        }
    }

    /// Merge this gain into a CFG1 byte, keeping bits [7:5] untouched
    #[must_use]
    pub const fn merge_into(self, cfg1: u8) -> u8 {
        (cfg1 & !Self::FIELD_MASK) | (self.bits() & Self::FIELD_MASK)
    }
}

/// Integration timing (ATIME step count, ASTEP step duration)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntegrationTime {
    /// Number of integration steps minus one
    pub atime: u8,
    /// Step duration in 2.78us units, minus one
    pub astep: u16,
}

impl IntegrationTime {
    /// Duration of one ASTEP unit in nanoseconds
    pub const STEP_UNIT_NS: u64 = 2780;

    /// Create a timing pair
    #[must_use]
    pub const fn new(atime: u8, astep: u16) -> Self {
        Self { atime, astep }
    }

    /// Exposure time in microseconds: (ATIME + 1) * (ASTEP + 1) * 2.78us
    #[must_use]
    pub const fn duration_us(self) -> u32 {
        let steps = (self.atime as u64 + 1) * (self.astep as u64 + 1);
        (steps * Self::STEP_UNIT_NS / 1000) as u32
    }
}

/// Measurement precision presets
///
/// Each preset is a fixed (ATIME, ASTEP, timeout) triple. Longer exposure
/// improves signal-to-noise at the cost of cycle time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrecisionMode {
    /// ATIME=0, ASTEP=999 (~2.8ms exposure), 50ms data-ready timeout
    Low,
    /// ATIME=1, ASTEP=20000, 500ms data-ready timeout
    #[default]
    Medium,
    /// ATIME=0, ASTEP=65534, 800ms data-ready timeout
    High,
}

/// Timing and timeout applied for a [`PrecisionMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PrecisionPreset {
    /// Integration timing written to the device
    pub timing: IntegrationTime,
    /// Data-ready timeout stored on the driver
    pub timeout_ms: u32,
}

impl PrecisionMode {
    /// The fixed preset for this mode
    #[must_use]
    pub const fn preset(self) -> PrecisionPreset {
        match self {
            Self::Low => PrecisionPreset {
                timing: IntegrationTime::new(0, 999),
                timeout_ms: 50,
            },
            Self::Medium => PrecisionPreset {
                timing: IntegrationTime::new(1, 20000),
                timeout_ms: 500,
            },
            Self::High => PrecisionPreset {
                timing: IntegrationTime::new(0, 65534),
                timeout_ms: 800,
            },
        }
    }
}
