#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod app;
pub mod clock;
pub mod config;
pub mod device;
pub mod interface;
pub mod registers;
pub mod spectral;

// Re-export main types
pub use app::{AppMode, SpectroApp};
pub use clock::Clock;
#[cfg(feature = "embassy-time")]
pub use clock::EmbassyClock;
pub use config::{Gain, IntegrationTime, PrecisionMode, PrecisionPreset};
pub use device::As7343Driver;
pub use interface::I2cInterface;
pub use spectral::{
    Channel, Measurement, NUM_CHANNELS, NUM_SORTED_CHANNELS, RawChannels, SORTED_CHANNEL_MAP,
    SortedChannels, SpectralBand,
};

/// AS7343 7-bit I2C address (fixed, not strappable)
pub const I2C_ADDRESS: u8 = 0x39;

/// Expected value of the `ID` register (Bank 1, 0x5A)
pub const DEVICE_ID: u8 = 0x81;

/// Register bank identifiers
///
/// The bank is selected by the `REG_BANK` bit (bit 4) of `CFG0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bank {
    /// Bank 0 - Measurement, configuration and data registers (0x80 and above)
    Bank0 = 0,
    /// Bank 1 - Identification and auxiliary registers (0x58-0x66)
    Bank1 = 1,
}

impl Bank {
    /// `REG_BANK` bit position in `CFG0`
    pub const CFG0_BIT: u8 = 4;

    /// Set or clear the bank bit in a `CFG0` byte, keeping every other bit
    #[must_use]
    pub const fn merge_into(self, cfg0: u8) -> u8 {
        match self {
            Self::Bank0 => cfg0 & !(1 << Self::CFG0_BIT),
            Self::Bank1 => cfg0 | (1 << Self::CFG0_BIT),
        }
    }

    /// Bank encoded in a `CFG0` byte
    #[must_use]
    pub const fn from_cfg0(cfg0: u8) -> Self {
        if cfg0 & (1 << Self::CFG0_BIT) == 0 {
            Self::Bank0
        } else {
            Self::Bank1
        }
    }
}

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Register transaction failed (NACK or short transfer)
    Bus(E),
    /// Reading or writing the bank-select register failed
    BankSelect(E),
    /// The measurement-valid bit was not seen before the timeout elapsed
    DataNotReady {
        /// Timeout that was in force for the poll
        timeout_ms: u32,
    },
    /// Caller-supplied buffer or slice has the wrong size
    MalformedCall,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
