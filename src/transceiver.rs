//! Generic packet radio interface
//!
//! Protocol code above the driver usually needs only a handful of operations.
//! [`Transceiver`] names them so that code can be written against the trait
//! and tested without a radio.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::clock::Clock;
use crate::config::Config;
use crate::registers::Mode;
use crate::{Device, Error};

/// A blocking packet transceiver.
///
/// Packet buffers use the length-prefixed layout described in
/// [`packet`](crate::packet). Operations that wait report a timeout as
/// `Ok(false)`.
pub trait Transceiver {
    /// Error raised by the underlying hardware
    type Error;

    /// Resets the radio and applies `config`
    fn configure(&mut self, config: &Config) -> Result<(), Self::Error>;

    /// Switches to `mode` and waits for the radio to confirm it
    fn switch_mode(&mut self, mode: Mode) -> Result<bool, Self::Error>;

    /// Mode the radio reports right now
    fn current_mode(&mut self) -> Result<Mode, Self::Error>;

    /// Sends one packet and waits until it has left the radio
    fn send_packet(&mut self, packet: &[u8]) -> Result<bool, Self::Error>;

    /// Whether a received packet is waiting to be read
    fn packet_received(&mut self) -> Result<bool, Self::Error>;

    /// Copies a received packet into `packet`, returning the bytes written
    fn read_packet(&mut self, packet: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<SPI, RST, CLK> Transceiver for Device<SPI, RST, CLK>
where
    SPI: SpiDevice,
    RST: OutputPin,
    CLK: Clock,
{
    type Error = Error;

    fn configure(&mut self, config: &Config) -> Result<(), Error> {
        self.init(config)
    }

    fn switch_mode(&mut self, mode: Mode) -> Result<bool, Error> {
        Device::switch_mode(self, mode)
    }

    fn current_mode(&mut self) -> Result<Mode, Error> {
        Device::current_mode(self)
    }

    fn send_packet(&mut self, packet: &[u8]) -> Result<bool, Error> {
        Device::send_packet(self, packet)
    }

    fn packet_received(&mut self) -> Result<bool, Error> {
        Device::packet_received(self)
    }

    fn read_packet(&mut self, packet: &mut [u8]) -> Result<usize, Error> {
        Device::read_packet(self, packet)
    }
}
