//! Driver error type
//!
//! Only faults of the bus, the reset line, or malformed data end up here.
//! A wait that runs out of time is not an error: mode switches, event waits
//! and packet sends report it as `Ok(false)` and leave recovery to the caller.

use core::convert::Infallible;

use crate::registers::{InvalidLnaSensitivity, InvalidMode};

/// Errors returned by [`Device`](crate::Device) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The SPI transaction failed
    #[error("SPI transaction failed")]
    Bus,
    /// The reset line could not be driven
    #[error("reset pin could not be driven")]
    Pin,
    /// The operating mode field held a value outside 0..=4
    #[error("mode field holds invalid value {0}")]
    InvalidMode(u8),
    /// The LNA sensitivity register held a value other than normal or boosted
    #[error("LNA sensitivity register holds invalid value {0:#04x}")]
    InvalidLnaSensitivity(u8),
    /// An outgoing packet declared more than 64 payload bytes, or fewer
    /// bytes were supplied than its length prefix announced
    #[error("malformed packet with length prefix {len}")]
    InvalidPacket {
        /// The offending length prefix
        len: u8,
    },
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl From<InvalidMode> for Error {
    fn from(err: InvalidMode) -> Self {
        Error::InvalidMode(err.0)
    }
}

impl From<InvalidLnaSensitivity> for Error {
    fn from(err: InvalidLnaSensitivity) -> Self {
        Error::InvalidLnaSensitivity(err.0)
    }
}
