//! Interrupt flag registers
//!
//! The chip reports packet engine events through `IrqFlags2`. The flags are
//! live hardware state: most of them clear themselves as soon as the
//! condition disappears (for example `PAYLOAD_READY` clears once the FIFO has
//! been emptied), so a read only says what was true at that instant.

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister};

bitflags! {
    /// Packet engine event flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventFlags: u8 {
        /// FIFO is full (66 bytes)
        const FIFO_FULL = 1 << 7;
        /// FIFO holds at least one byte
        const FIFO_NOT_EMPTY = 1 << 6;
        /// FIFO level exceeds the threshold
        const FIFO_LEVEL = 1 << 5;
        /// FIFO overrun occurred
        const FIFO_OVERRUN = 1 << 4;
        /// Packet transmission finished, cleared when leaving TX
        const PACKET_SENT = 1 << 3;
        /// A complete payload is in the FIFO, cleared once it is read out
        const PAYLOAD_READY = 1 << 2;
        /// CRC of the received payload is valid
        const CRC_OK = 1 << 1;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EventFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "EventFlags({=u8:#b})", self.bits())
    }
}

/// Interrupt flags 2 register (address: 0x28)
///
/// Read only. Flags are set and cleared by the packet engine.
#[register(0x28u8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
pub struct IrqFlags2 {
    /// Current event flags
    pub flags: EventFlags,
}

impl FromByteArray for IrqFlags2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: EventFlags::from_bits_retain(bytes[0]),
        })
    }
}
