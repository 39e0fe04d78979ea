//! Monotonic time source
//!
//! Every wait in the driver is a busy poll measured against a [`Clock`]. The
//! clock is injected at construction so the same code runs against a hardware
//! timer on target and against a stepping mock in tests.

/// A free-running millisecond counter.
///
/// The counter may wrap; elapsed time is always computed with wrapping
/// subtraction, so a wrap in the middle of a wait is harmless as long as a
/// single wait is shorter than `u32::MAX` milliseconds.
pub trait Clock {
    /// Current value of the counter in milliseconds
    fn now_ms(&mut self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now_ms(&mut self) -> u32 {
        (**self).now_ms()
    }
}

/// A timeout started at a given instant.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    start: u32,
    timeout_ms: u32,
}

impl Deadline {
    pub(crate) fn start<C: Clock>(clock: &mut C, timeout_ms: u32) -> Self {
        Self {
            start: clock.now_ms(),
            timeout_ms,
        }
    }

    pub(crate) fn expired<C: Clock>(&self, clock: &mut C) -> bool {
        clock.now_ms().wrapping_sub(self.start) >= self.timeout_ms
    }
}

/// Spins until `duration_ms` have elapsed.
pub(crate) fn busy_wait<C: Clock>(clock: &mut C, duration_ms: u32) {
    let deadline = Deadline::start(clock, duration_ms);
    while !deadline.expired(clock) {}
}

/// [`Clock`] backed by [`std::time::Instant`], counting from its creation.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Starts a new clock at zero
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&mut self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }
}
