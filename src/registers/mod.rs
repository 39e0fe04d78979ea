//! Register definitions for the RFM69 / SX1231
//! Generated from the SX1231 datasheet rev. 7
//!
//! All registers use 7-bit addresses. Multi-byte registers occupy consecutive
//! addresses and are transferred MSB first in a single burst, relying on the
//! chip's address auto-increment.

mod common;
mod irq;
mod packet;
mod receiver;
mod transmitter;

pub use common::*;
pub use irq::*;
pub use packet::*;
pub use receiver::*;
pub use transmitter::*;

/// FIFO access address. Burst accesses do not auto-increment here.
pub const REG_FIFO: u8 = 0x00;

/// Last sync word byte. Unused with a 4 byte sync word, so it is free for
/// bus presence checks.
pub const REG_SYNC_VALUE8: u8 = 0x36;
