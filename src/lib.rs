#![cfg_attr(not(any(test, feature = "std")), no_std)]
//! RFM69 Radio Driver
//!
//! This crate provides a blocking, type-safe interface for the HopeRF RFM69
//! family of sub-GHz packet radio modules, built around the Semtech SX1231
//! transceiver. The driver runs the chip in its packet engine mode with FSK
//! modulation, variable length packets, CRC and optional AES encryption.
//!
//! # Features
//! - Frequency range: 290-1020 MHz, set in kHz steps
//! - (G)FSK at up to ~10 kbaud with the fixed 5 kHz deviation
//! - Packets of up to 64 payload bytes with a length prefix
//! - Output power up to +13 dBm (RFM69W) or +20 dBm (RFM69HW/HCW)
//! - Receiver sensitivity boost
//! - 32-bit network identifier as sync word
//! - AES-128 payload encryption
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Main device interface and register channel
//!   - Single register, burst and length-prefixed SPI accesses
//!   - Typed register access through `regiface`
//!
//! - [`registers`]: Register definitions for direct hardware access
//!
//! - [`config`]: Reset, configuration, probing, network id and key
//! - [`mode`]: Operating mode transitions with hardware confirmation
//! - [`events`]: Polling of the packet engine event flags
//! - [`packet`]: Loading, sending and reading packets
//! - [`clock`]: Injected millisecond clock used for every timeout
//! - [`transceiver`]: Hardware independent packet radio trait
//!
//! # Usage
//! The main entry point is the [`Device`] struct which wraps an SPI device,
//! the reset pin and a [`Clock`]. All operations are blocking and poll the
//! chip until they complete or their timeout runs out.
//!
//! 1. Create a new [`Device`] instance with your SPI interface, reset pin and clock
//! 2. Call [`Device::init`] with a [`Config`]
//! 3. Optionally set the network id and the AES key
//! 4. Use [`Device::send_packet`] to transmit
//! 5. Use [`Device::start_rx`], then poll [`Device::packet_received`] and
//!    call [`Device::read_packet`] to receive
//!
//! # Important Notes
//! - Waits that time out return `Ok(false)`; only bus and pin faults are errors
//! - A radio that stops confirming mode changes is recovered with
//!   [`Device::init`]
//! - [`PowerMode::BoostMax`] must stay at or below 1% transmit duty cycle
//! - The device is not shared: every operation takes `&mut self`
//!
//! # Example
//! ```ignore
//! use rf69::{Config, Device, MAX_PACKET_LEN};
//!
//! let mut radio = Device::new(spi, reset, clock);
//! radio.init(&Config::default())?;
//! radio.set_network_id(0x2DD4_1234)?;
//!
//! if !radio.send_packet(&[5, b'h', b'e', b'l', b'l', b'o'])? {
//!     // not confirmed, the radio may need another init
//! }
//!
//! radio.start_rx()?;
//! let mut buf = [0u8; MAX_PACKET_LEN];
//! if radio.packet_received()? {
//!     let n = radio.read_packet(&mut buf)?;
//! }
//! ```

#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod device;
mod error;
pub mod events;
pub mod mode;
pub mod packet;
pub mod registers;
pub mod transceiver;

#[cfg(test)]
mod testing;

#[cfg(feature = "std")]
pub use clock::StdClock;
pub use clock::Clock;
pub use config::{Config, PowerMode};
pub use device::{Device, DeviceFlags};
pub use error::Error;
pub use mode::MODE_SWITCH_TIMEOUT_MS;
pub use packet::{MAX_PACKET_LEN, MAX_PAYLOAD_LEN, PACKET_SEND_TIMEOUT_MS};
pub use registers::{EventFlags, Mode};
pub use transceiver::Transceiver;
