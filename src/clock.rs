//! Monotonic time source for bounded polling
//!
//! The data-ready handshake is a busy-wait bounded by a timeout measured from
//! the start of the poll. The driver reads elapsed time through [`Clock`] so the
//! bound can be driven by a hardware timer on target and by a scripted clock in
//! tests.

/// Monotonic millisecond clock
///
/// Implementations must never go backwards. The absolute origin is irrelevant;
/// only differences between two readings are used.
pub trait Clock {
    /// Current time in milliseconds since an arbitrary origin
    fn now_ms(&mut self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now_ms(&mut self) -> u64 {
        (**self).now_ms()
    }
}

/// [`Clock`] backed by the `embassy-time` global time driver
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now_ms(&mut self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
