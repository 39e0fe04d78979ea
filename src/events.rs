//! Event flag polling
//!
//! The chip signals packet engine events only through [`IrqFlags2`]; there is
//! no interrupt path in this driver. Waiting for an event is therefore a busy
//! poll of that register against the injected clock.
//!
//! Flags are not latched. A flag that sets and clears again between two polls
//! is never seen.

use embedded_hal::spi::SpiDevice;

use crate::clock::{Clock, Deadline};
use crate::registers::{EventFlags, IrqFlags2};
use crate::{Device, Error};

impl<SPI, RST, CLK> Device<SPI, RST, CLK>
where
    SPI: SpiDevice,
    CLK: Clock,
{
    /// Reads the current event flags.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn read_events(&mut self) -> Result<EventFlags, Error> {
        Ok(self.read_register::<IrqFlags2>()?.flags)
    }

    /// Polls the event flags until any flag in `events` is set or
    /// `timeout_ms` elapses.
    ///
    /// The flags are read at least once, so a flag that is already set
    /// returns `true` without waiting.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn wait_event(&mut self, events: EventFlags, timeout_ms: u32) -> Result<bool, Error> {
        let deadline = Deadline::start(&mut self.clock, timeout_ms);

        loop {
            if self.read_events()?.intersects(events) {
                return Ok(true);
            }

            if deadline.expired(&mut self.clock) {
                debug!("events {} not raised within {} ms", events.bits(), timeout_ms);
                return Ok(false);
            }
        }
    }
}
