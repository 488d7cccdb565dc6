//! High-level driver API for the AS7343
//!
//! This module provides the register-bank controller, the configuration
//! setters, the data-ready handshake and the 18-channel burst readout.
//!
//! The driver keeps no copy of the selected bank. The bank-select bit is
//! device state that any other routine may have changed, so every operation
//! re-asserts the bank it needs before touching a banked register.

use crate::clock::Clock;
use crate::config::{Gain, PrecisionMode};
use crate::registers::As7343 as RegisterDevice;
use crate::spectral::{self, Channel, Measurement, NUM_CHANNELS, RawChannels, SortedChannels};
use crate::{Bank, DEVICE_ID, Error};

use device_driver::RegisterInterface;

/// Address of `DATA0_L`, the low byte of the first channel slot
pub const DATA0_L: u8 = 0x95;

/// Data-ready timeout in force until a setter or preset changes it
pub const DEFAULT_DATA_READY_TIMEOUT_MS: u32 = 100;

/// Oscillator settling time after setting PON
const POWER_ON_SETTLE_MS: u32 = 3;

/// `auto_smux` value selecting automatic 18-channel cycling
const AUTO_SMUX_18_CHANNELS: u8 = 3;

/// Main driver for the AS7343
pub struct As7343Driver<I, C> {
    device: RegisterDevice<I>,
    clock: C,
    data_ready_timeout_ms: u32,
}

impl<I, C> As7343Driver<I, C>
where
    I: RegisterInterface<AddressType = u8>,
    C: Clock,
{
    /// Create a new AS7343 driver instance
    ///
    /// No bus traffic happens here. Call [`init()`](Self::init) to power the
    /// sensor up and [`is_connected()`](Self::is_connected) to verify the part.
    pub fn new(interface: I, clock: C) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            clock,
            data_ready_timeout_ms: DEFAULT_DATA_READY_TIMEOUT_MS,
        }
    }

    /// Power the sensor up and start continuous 18-channel measurement
    ///
    /// Sequence:
    /// 1. Set PON and wait 3ms for the oscillator
    /// 2. Select automatic 18-channel SMUX cycling
    /// 3. Set gain to 16x
    /// 4. Set SP_EN to start measuring
    ///
    /// Integration timing is left at whatever the device holds; apply a
    /// [`PrecisionMode`] or call [`set_integration_time()`](Self::set_integration_time)
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error; later steps are not attempted.
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.select_bank(Bank::Bank0)?;

        self.device.enable().modify(|w| {
            w.set_pon(true);
        })?;

        delay.delay_ms(POWER_ON_SETTLE_MS);

        self.device.smux_config().modify(|w| {
            w.set_auto_smux(AUTO_SMUX_18_CHANNELS);
        })?;

        self.set_gain(Gain::X16)?;

        self.device.enable().modify(|w| {
            w.set_sp_en(true);
        })?;

        #[cfg(feature = "defmt")]
        defmt::debug!("AS7343 powered on, 18-channel auto SMUX, gain 16x");

        Ok(())
    }

    /// Select a register bank
    ///
    /// Read-modify-writes `CFG0`, changing only the `REG_BANK` bit. `CFG0` is
    /// reachable from either bank, so this works regardless of the current
    /// selection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BankSelect`] if the read or the write of `CFG0` fails.
    pub fn select_bank(&mut self, bank: Bank) -> Result<(), Error<I::Error>> {
        self.device
            .bank_config()
            .modify(|w| {
                w.set_reg_bank(bank == Bank::Bank1);
            })
            .map_err(Error::BankSelect)
    }

    /// Check that an AS7343 answers on the bus
    ///
    /// Reads the `ID` register in Bank 1 and compares it against
    /// [`DEVICE_ID`]. Bank 0 is re-selected before returning, whether the
    /// identity read succeeded, failed or mismatched. A mismatch is `Ok(false)`,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if selecting Bank 1 fails, if the identity read fails,
    /// or if restoring Bank 0 fails (even when the identity matched).
    pub fn is_connected(&mut self) -> Result<bool, Error<I::Error>> {
        self.select_bank(Bank::Bank1)?;
        let id = self.device.id().read().map(|reg| reg.id());
        let restored = self.select_bank(Bank::Bank0);

        let id = id?;
        restored?;

        if id != DEVICE_ID {
            #[cfg(feature = "defmt")]
            defmt::warn!("AS7343 identity mismatch: read {=u8:#x}", id);
            return Ok(false);
        }
        Ok(true)
    }

    /// Set the spectral gain
    ///
    /// Only the 5-bit `AGAIN` field of CFG1 is changed; bits [7:5] keep their
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns an error if selecting Bank 0 or the CFG1 read-modify-write fails.
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<I::Error>> {
        self.select_bank(Bank::Bank0)?;
        self.device.gain_config().modify(|w| {
            w.set_again(gain.bits());
        })?;
        Ok(())
    }

    /// Set integration timing
    ///
    /// Writes ATIME, ASTEP_L and ASTEP_H in that order. The three writes are
    /// not atomic: the first failure returns immediately and the registers
    /// after it keep their old values.
    ///
    /// # Errors
    ///
    /// Returns an error if selecting Bank 0 or any of the three writes fails.
    pub fn set_integration_time(&mut self, atime: u8, astep: u16) -> Result<(), Error<I::Error>> {
        let [astep_low, astep_high] = astep.to_le_bytes();

        self.select_bank(Bank::Bank0)?;
        self.device.atime().write(|w| {
            w.set_atime(atime);
        })?;
        self.device.astep_low().write(|w| {
            w.set_astep_low(astep_low);
        })?;
        self.device.astep_high().write(|w| {
            w.set_astep_high(astep_high);
        })?;
        Ok(())
    }

    /// Set the data-ready timeout used by every following acquisition
    ///
    /// A poll already in progress keeps the bound it started with.
    pub fn set_data_ready_timeout(&mut self, timeout_ms: u32) {
        self.data_ready_timeout_ms = timeout_ms;
    }

    /// Current data-ready timeout in milliseconds
    #[must_use]
    pub const fn data_ready_timeout(&self) -> u32 {
        self.data_ready_timeout_ms
    }

    /// Apply a precision preset: integration timing, then the timeout
    ///
    /// # Errors
    ///
    /// Returns the timing write error; the timeout is left unchanged in that case.
    pub fn apply_precision(&mut self, mode: PrecisionMode) -> Result<(), Error<I::Error>> {
        let preset = mode.preset();
        self.set_integration_time(preset.timing.atime, preset.timing.astep)?;
        self.set_data_ready_timeout(preset.timeout_ms);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Precision {}: ATIME={} ASTEP={} timeout={}ms",
            mode,
            preset.timing.atime,
            preset.timing.astep,
            preset.timeout_ms
        );

        Ok(())
    }

    /// Wait until the current measurement cycle has completed
    ///
    /// Polls `STATUS2.AVALID` back-to-back until it is set or the configured
    /// timeout has elapsed since the first poll. Elapsed time is checked after
    /// every status read, so the overshoot is bounded by one poll.
    ///
    /// # Errors
    ///
    /// - [`Error::BankSelect`] if Bank 0 cannot be selected
    /// - [`Error::Bus`] as soon as a status read fails
    /// - [`Error::DataNotReady`] if the bit is never seen within the timeout
    pub fn wait_data_ready(&mut self) -> Result<(), Error<I::Error>> {
        self.select_bank(Bank::Bank0)?;

        let timeout_ms = self.data_ready_timeout_ms;
        let start = self.clock.now_ms();

        loop {
            if self.device.data_status().read()?.avalid() {
                return Ok(());
            }

            let elapsed = self.clock.now_ms().saturating_sub(start);
            if elapsed >= u64::from(timeout_ms) {
                #[cfg(feature = "defmt")]
                defmt::warn!("AS7343 data not ready after {}ms", timeout_ms);
                return Err(Error::DataNotReady { timeout_ms });
            }
        }
    }

    /// Read all 18 channel slots
    ///
    /// Waits for data-ready, then reads each slot as a two-byte
    /// little-endian pair starting at [`DATA0_L`]. Nothing is cached: every
    /// call runs a fresh handshake and a full burst.
    ///
    /// # Errors
    ///
    /// Any failure in the handshake or in a single slot read aborts the call;
    /// no partial data is returned.
    pub fn read_all_channels(&mut self) -> Result<RawChannels, Error<I::Error>> {
        self.wait_data_ready()?;

        let mut channels = [0u16; NUM_CHANNELS];
        let mut address = DATA0_L;
        for value in &mut channels {
            let mut buffer = [0u8; 2];
            self.device.interface.read_register(address, 16, &mut buffer)?;
            *value = u16::from_le_bytes(buffer);
            address += 2;
        }

        Ok(channels)
    }

    /// Read all 18 channel slots into a caller buffer
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedCall`] without touching the bus if `out`
    /// holds fewer than 18 values; otherwise as
    /// [`read_all_channels()`](Self::read_all_channels). On error `out` is
    /// left unmodified.
    pub fn read_all_channels_into(&mut self, out: &mut [u16]) -> Result<(), Error<I::Error>> {
        let Some(out) = out.get_mut(..NUM_CHANNELS) else {
            return Err(Error::MalformedCall);
        };
        let channels = self.read_all_channels()?;
        out.copy_from_slice(&channels);
        Ok(())
    }

    /// Read a single channel slot
    ///
    /// # Errors
    ///
    /// Same conditions as [`read_all_channels()`](Self::read_all_channels).
    pub fn read_single_channel(&mut self, channel: Channel) -> Result<u16, Error<I::Error>> {
        self.wait_data_ready()?;

        let mut buffer = [0u8; 2];
        self.device
            .interface
            .read_register(channel.data_address(), 16, &mut buffer)?;

        Ok(u16::from_le_bytes(buffer))
    }

    /// Read the 12 spectral bands in wavelength order
    ///
    /// # Errors
    ///
    /// Same conditions as [`read_all_channels()`](Self::read_all_channels).
    pub fn read_sorted_channels(&mut self) -> Result<SortedChannels, Error<I::Error>> {
        let raw = self.read_all_channels()?;
        Ok(spectral::remap(&raw))
    }

    /// Run one acquisition and return both the raw and the sorted view
    ///
    /// # Errors
    ///
    /// Same conditions as [`read_all_channels()`](Self::read_all_channels).
    pub fn measure(&mut self) -> Result<Measurement, Error<I::Error>> {
        let raw = self.read_all_channels()?;
        Ok(Measurement::from_raw(raw))
    }

    /// Consume the driver and return the underlying interface and clock
    pub fn release(self) -> (I, C) {
        (self.device.interface, self.clock)
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &RegisterDevice<I> {
        &self.device
    }

    /// Get a mutable reference to the underlying register device (for advanced usage)
    ///
    /// Accesses made through it do not select a bank.
    pub const fn device_mut(&mut self) -> &mut RegisterDevice<I> {
        &mut self.device
    }
}
