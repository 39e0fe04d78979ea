//! Operating mode control
//!
//! Mode changes are requested by writing the mode field of [`OpMode`] and
//! confirmed by polling the same field until the chip reports the new mode.
//! The two halves are exposed separately ([`Device::request_mode`],
//! [`Device::wait_mode`]) and combined in [`Device::switch_mode`], which is
//! what callers normally use.
//!
//! # Timeouts
//! A confirmation that does not arrive within the timeout is reported as
//! `Ok(false)`. Nothing is rolled back and nothing is retried: the request
//! stays in the register and the chip may still complete it later. A radio
//! that keeps timing out has to be brought back with
//! [`Device::init`](crate::Device::init).
//!
//! # Requested vs. actual mode
//! [`Device::current_mode`] reads the chip and is the ground truth.
//! [`Device::last_requested_mode`] returns what the driver last asked for,
//! which may not have happened yet, or at all.

use embedded_hal::spi::SpiDevice;

use crate::clock::{Clock, Deadline};
use crate::registers::{Mode, OpMode, TestPa1, TestPa2};
use crate::{Device, Error};

/// Default time allowed for a mode transition to be confirmed
pub const MODE_SWITCH_TIMEOUT_MS: u32 = 100;

impl<SPI, RST, CLK> Device<SPI, RST, CLK>
where
    SPI: SpiDevice,
    CLK: Clock,
{
    /// Requests a transition to `mode` without waiting for it.
    ///
    /// `mode` is recorded as the last requested mode before the register is
    /// written. When the +20 dBm settings are active the PA test registers
    /// are switched first, to their high power values for transmit and back
    /// to normal for every other mode.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn request_mode(&mut self, mode: Mode) -> Result<(), Error> {
        debug!("requesting mode {:?}", mode);
        self.flags.last_requested_mode = mode;

        if self.flags.high_power {
            if mode == Mode::Transmit {
                self.write_register(TestPa1::HIGH_POWER)?;
                self.write_register(TestPa2::HIGH_POWER)?;
            } else {
                self.write_register(TestPa1::NORMAL)?;
                self.write_register(TestPa2::NORMAL)?;
            }
        }

        self.write_register(OpMode::new(mode))
    }

    /// Polls the chip until it reports `mode` or `timeout_ms` elapses.
    ///
    /// The mode register is read at least once. Reserved values in the mode
    /// field are treated as "not there yet".
    ///
    /// # Returns
    /// `true` if the chip reached `mode`, `false` on timeout
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn wait_mode(&mut self, mode: Mode, timeout_ms: u32) -> Result<bool, Error> {
        let deadline = Deadline::start(&mut self.clock, timeout_ms);

        loop {
            match self.read_register::<OpMode>() {
                Ok(op_mode) if op_mode.mode == mode => return Ok(true),
                Ok(_) | Err(Error::InvalidMode(_)) => {}
                Err(err) => return Err(err),
            }

            if deadline.expired(&mut self.clock) {
                warn!("mode {:?} not reached within {} ms", mode, timeout_ms);
                return Ok(false);
            }
        }
    }

    /// Requests `mode` and waits up to [`MODE_SWITCH_TIMEOUT_MS`] for it.
    pub fn switch_mode(&mut self, mode: Mode) -> Result<bool, Error> {
        self.request_mode(mode)?;
        self.wait_mode(mode, MODE_SWITCH_TIMEOUT_MS)
    }

    /// Switches to sleep mode
    pub fn sleep(&mut self) -> Result<bool, Error> {
        self.switch_mode(Mode::Sleep)
    }

    /// Switches to transmit mode, sending whatever the FIFO holds
    pub fn start_tx(&mut self) -> Result<bool, Error> {
        self.switch_mode(Mode::Transmit)
    }

    /// Switches to receive mode
    pub fn start_rx(&mut self) -> Result<bool, Error> {
        self.switch_mode(Mode::Receive)
    }

    /// Switches back to idle, abandoning any transmission or reception
    pub fn cancel(&mut self) -> Result<bool, Error> {
        self.switch_mode(Mode::Idle)
    }

    /// Reads the operating mode the chip is in right now.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * `Error::InvalidMode` - the mode field holds a reserved value
    pub fn current_mode(&mut self) -> Result<Mode, Error> {
        Ok(self.read_register::<OpMode>()?.mode)
    }

    /// The mode most recently passed to [`request_mode`](Device::request_mode)
    pub fn last_requested_mode(&self) -> Mode {
        self.flags.last_requested_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeRadio, NoopPin, StepClock};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    const ALL_MODES: [Mode; 5] = [
        Mode::Sleep,
        Mode::Idle,
        Mode::Intermediate,
        Mode::Transmit,
        Mode::Receive,
    ];

    #[test]
    fn test_request_writes_mode_field() {
        let spi = SpiMock::new(&[
            SpiTransaction::transaction_start(),
            SpiTransaction::write(0x81),
            SpiTransaction::write(0x10),
            SpiTransaction::transaction_end(),
        ]);
        let mut dev = Device::new(spi, NoopPin, StepClock::new(0, 1));

        dev.request_mode(Mode::Receive).unwrap();
        assert_eq!(dev.last_requested_mode(), Mode::Receive);
        dev.release().0.done();
    }

    #[test]
    fn test_successful_switch_is_confirmed_by_hardware() {
        let mut radio = FakeRadio::new();
        radio.mode_lag = 3;
        let mut dev = Device::new(&mut radio, NoopPin, StepClock::new(0, 1));

        for mode in ALL_MODES {
            assert!(dev.switch_mode(mode).unwrap());
            assert_eq!(dev.current_mode().unwrap(), mode);
            assert_eq!(dev.last_requested_mode(), mode);
        }
    }

    #[test]
    fn test_wrappers_target_fixed_modes() {
        let mut radio = FakeRadio::new();
        let mut dev = Device::new(&mut radio, NoopPin, StepClock::new(0, 1));

        assert!(dev.start_rx().unwrap());
        assert_eq!(dev.current_mode().unwrap(), Mode::Receive);
        assert!(dev.start_tx().unwrap());
        assert_eq!(dev.current_mode().unwrap(), Mode::Transmit);
        assert!(dev.sleep().unwrap());
        assert_eq!(dev.current_mode().unwrap(), Mode::Sleep);
        assert!(dev.cancel().unwrap());
        assert_eq!(dev.current_mode().unwrap(), Mode::Idle);
    }

    #[test]
    fn test_failed_switch_keeps_request() {
        let mut radio = FakeRadio::new();
        radio.stuck = true;
        let mut clock = StepClock::new(0, 1);

        {
            let mut dev = Device::new(&mut radio, NoopPin, &mut clock);
            for mode in [Mode::Receive, Mode::Transmit, Mode::Sleep] {
                assert!(!dev.switch_mode(mode).unwrap());
                assert_eq!(dev.last_requested_mode(), mode);
                assert_eq!(dev.current_mode().unwrap(), Mode::Idle);
            }
        }

        // Three full timeouts were waited out, with no retries in between
        assert!(clock.now >= 3 * MODE_SWITCH_TIMEOUT_MS);
        assert_eq!(radio.writes_to(0x01), vec![0x10, 0x0C, 0x00]);
    }

    #[test]
    fn test_wait_mode_gives_up_at_deadline() {
        let mut radio = FakeRadio::new();
        radio.stuck = true;
        let mut clock = StepClock::new(1_000, 5);

        {
            let mut dev = Device::new(&mut radio, NoopPin, &mut clock);
            assert!(!dev.wait_mode(Mode::Receive, 50).unwrap());
        }

        assert!(clock.now >= 1_050);
        assert!(clock.now <= 1_060);
    }

    #[test]
    fn test_wait_mode_tolerates_reserved_field_values() {
        let mut radio = FakeRadio::new();
        radio.regs[0x01] = 7 << 2;
        radio.stuck = true;
        let mut dev = Device::new(&mut radio, NoopPin, StepClock::new(0, 10));

        assert!(!dev.wait_mode(Mode::Idle, 30).unwrap());
        assert_eq!(dev.current_mode().unwrap_err(), Error::InvalidMode(7));
    }

    #[test]
    fn test_high_power_switches_pa_test_registers() {
        let mut radio = FakeRadio::new();

        {
            let mut dev = Device::new(&mut radio, NoopPin, StepClock::new(0, 1));
            dev.flags.high_power = true;
            assert!(dev.start_tx().unwrap());
            assert!(dev.start_rx().unwrap());
        }

        assert_eq!(radio.writes_to(0x5A), vec![0x5D, 0x55]);
        assert_eq!(radio.writes_to(0x5C), vec![0x7C, 0x70]);
    }

    #[test]
    fn test_normal_power_leaves_pa_test_registers_alone() {
        let mut radio = FakeRadio::new();

        {
            let mut dev = Device::new(&mut radio, NoopPin, StepClock::new(0, 1));
            assert!(dev.start_tx().unwrap());
        }

        assert!(radio.writes_to(0x5A).is_empty());
        assert!(radio.writes_to(0x5C).is_empty());
    }
}
