//! Application layer for the spectrometer control loop
//!
//! [`SpectroApp`] owns the driver, remembers the operating and precision
//! modes, and turns each acquisition into one line of serial output. A failed
//! acquisition is reported and the cycle skipped; the next call starts fresh.

use core::fmt::Write;

use device_driver::RegisterInterface;

use crate::Error;
use crate::clock::Clock;
use crate::config::PrecisionMode;
use crate::device::As7343Driver;
use crate::spectral::Measurement;

/// Line prefix for data-log output; host-side loggers key on it
pub const DATA_LOG_PREFIX: &str = "SORTED(405-855nm): ";

/// Line prefix for normalised feature output
pub const FEATURES_PREFIX: &str = "FEATURES(l1): ";

/// Line prefix for measurements forwarded to a host for inference
pub const PC_MEASUREMENT_PREFIX: &str = "MEAS,";

/// Line written when an acquisition fails
pub const ACQUIRE_ERROR_LINE: &str = "[spectro_app] ERROR: Failed to acquire measurement.";

/// What the control loop does with each measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppMode {
    /// Print the 12 sorted bands
    #[default]
    DataLog,
    /// Emit the L1-normalised feature vector for an on-board model
    InferLocal,
    /// Forward the sorted bands to a host for inference
    InferPc,
}

/// Spectrometer application state
pub struct SpectroApp<I, C> {
    driver: As7343Driver<I, C>,
    mode: AppMode,
    precision: PrecisionMode,
}

impl<I, C> SpectroApp<I, C>
where
    I: RegisterInterface<AddressType = u8>,
    C: Clock,
{
    /// Wrap an initialised driver; mode `DataLog`, precision `Medium`
    ///
    /// The precision preset is not written until [`init()`](Self::init).
    pub fn new(driver: As7343Driver<I, C>) -> Self {
        Self {
            driver,
            mode: AppMode::default(),
            precision: PrecisionMode::default(),
        }
    }

    /// Apply the current precision preset to the device
    ///
    /// # Errors
    ///
    /// Returns an error if writing the integration timing fails.
    pub fn init(&mut self) -> Result<(), Error<I::Error>> {
        self.driver.apply_precision(self.precision)
    }

    /// Set the operating mode
    pub fn set_mode(&mut self, mode: AppMode) {
        self.mode = mode;
    }

    /// Current operating mode
    #[must_use]
    pub const fn mode(&self) -> AppMode {
        self.mode
    }

    /// Record and apply a precision preset
    ///
    /// The mode is recorded even if applying it fails, so a later
    /// [`init()`](Self::init) retries the same preset.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the integration timing fails.
    pub fn set_precision_mode(&mut self, precision: PrecisionMode) -> Result<(), Error<I::Error>> {
        self.precision = precision;
        self.driver.apply_precision(precision)
    }

    /// Current precision preset
    #[must_use]
    pub const fn precision_mode(&self) -> PrecisionMode {
        self.precision
    }

    /// Acquire one measurement, `None` if any step failed
    pub fn acquire(&mut self) -> Option<Measurement> {
        match self.driver.measure() {
            Ok(measurement) => Some(measurement),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Acquisition failed, skipping cycle");
                None
            }
        }
    }

    /// Run one control-loop step: acquire, then output according to the mode
    ///
    /// # Errors
    ///
    /// Only propagates formatting errors from `out`; acquisition failures are
    /// written as an error line.
    pub fn run_once<W: Write>(&mut self, out: &mut W) -> core::fmt::Result {
        let Some(measurement) = self.acquire() else {
            return write!(out, "{ACQUIRE_ERROR_LINE}\r\n");
        };

        match self.mode {
            AppMode::DataLog => write_data_log(out, &measurement),
            AppMode::InferLocal => write_features(out, &measurement),
            AppMode::InferPc => write_pc_measurement(out, &measurement),
        }
    }

    /// Echo a response line received from the host
    ///
    /// Surrounding whitespace is trimmed; blank lines produce no output.
    ///
    /// # Errors
    ///
    /// Propagates formatting errors from `out`.
    pub fn handle_pc_response<W: Write>(&self, line: &str, out: &mut W) -> core::fmt::Result {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        write!(out, "[spectro_app] PC response: {line}\r\n")
    }

    /// Get a reference to the driver
    pub const fn driver(&self) -> &As7343Driver<I, C> {
        &self.driver
    }

    /// Get a mutable reference to the driver
    pub const fn driver_mut(&mut self) -> &mut As7343Driver<I, C> {
        &mut self.driver
    }

    /// Consume the application and return the driver
    pub fn release(self) -> As7343Driver<I, C> {
        self.driver
    }
}

/// `SORTED(405-855nm): v0,v1,...,v11`
fn write_data_log<W: Write>(out: &mut W, measurement: &Measurement) -> core::fmt::Result {
    out.write_str(DATA_LOG_PREFIX)?;
    write_joined(out, &measurement.sorted)?;
    out.write_str("\r\n")
}

/// `FEATURES(l1): f0,...,f11`, six decimals
fn write_features<W: Write>(out: &mut W, measurement: &Measurement) -> core::fmt::Result {
    out.write_str(FEATURES_PREFIX)?;
    for (i, feature) in measurement.l1_normalized().iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write!(out, "{feature:.6}")?;
    }
    out.write_str("\r\n")
}

/// `MEAS,v0,...,v11`
fn write_pc_measurement<W: Write>(out: &mut W, measurement: &Measurement) -> core::fmt::Result {
    out.write_str(PC_MEASUREMENT_PREFIX)?;
    write_joined(out, &measurement.sorted)?;
    out.write_str("\r\n")
}

fn write_joined<W: Write>(out: &mut W, values: &[u16]) -> core::fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        write!(out, "{value}")?;
    }
    Ok(())
}
