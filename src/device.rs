//! RFM69 Device Interface
//!
//! This module provides the register channel of the driver: every other
//! component talks to the radio through the single-register, burst and typed
//! register accessors defined here.
//!
//! The interface is built around the `Device<SPI, RST, CLK>` struct which
//! wraps an SPI device, the hard-reset line and a monotonic clock. Each
//! accessor is exactly one [`SpiDevice::transaction`], so the chip-select line
//! is asserted for the address byte and the data bytes that follow and
//! released afterwards. The exception is
//! [`burst_read_prefixed`](Device::burst_read_prefixed): the length of its
//! data phase depends on the first byte read, so the length byte gets a
//! transaction of its own.
//!
//! # Wire format
//! - Address byte first, bit 7 set for writes and cleared for reads
//! - Data bytes follow MSB first; the chip auto-increments the address for
//!   every register except the FIFO
//!
//! # Example
//! ```ignore
//! use rf69::{Device, registers::Version};
//!
//! // Create device with SPI interface, reset pin and clock
//! let spi = // ... SPI implementation
//! let mut device = Device::new(spi, reset, clock);
//!
//! // Read a register
//! let version: Version = device.read_register()?;
//!
//! // Write raw bytes
//! device.burst_write(0x2F, &[0x12, 0x34, 0x56, 0x78])?;
//! ```

use embedded_hal::spi::{Operation, SpiDevice};
use regiface::{ByteArray, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::registers::Mode;
use crate::Error;

const WRITE_FLAG: u8 = 0x80;
const ADDRESS_MASK: u8 = 0x7F;
/// Scratch size for dropping the part of a prefixed block that does not fit
const DRAIN_CHUNK_LEN: usize = 64;

/// State the driver keeps about the radio between calls.
///
/// These are driver-side records of intent, not hardware state. They are
/// reset by [`Device::init`](crate::Device::init) and otherwise only updated
/// by mode requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceFlags {
    /// Most recently requested operating mode
    pub last_requested_mode: Mode,
    /// Receiver sensitivity boost was requested at configuration time
    pub boost_enabled: bool,
    /// The +20 dBm transmit settings are in use, so the PA test registers
    /// follow every transition into and out of transmit
    pub high_power: bool,
}

/// Main device interface for the RFM69 radio.
///
/// Owns the SPI device, the reset pin and the clock for its whole lifetime.
/// All operations take `&mut self`; sharing one radio between execution
/// contexts must be serialized by the caller.
#[derive(Debug)]
pub struct Device<SPI, RST, CLK> {
    pub(crate) spi: SPI,
    pub(crate) reset: RST,
    pub(crate) clock: CLK,
    pub(crate) flags: DeviceFlags,
}

impl<SPI, RST, CLK> Device<SPI, RST, CLK> {
    /// Creates a new Device instance.
    ///
    /// # Arguments
    /// * `spi` - SPI device; owns the chip-select line and its timing
    /// * `reset` - Output pin wired to the RESET input of the radio
    /// * `clock` - Monotonic millisecond clock used for every timeout
    ///
    /// No bus traffic happens here. Call [`init`](Device::init) before use.
    pub fn new(spi: SPI, reset: RST, clock: CLK) -> Self {
        Self {
            spi,
            reset,
            clock,
            flags: DeviceFlags::default(),
        }
    }

    /// Releases the underlying peripherals.
    pub fn release(self) -> (SPI, RST, CLK) {
        (self.spi, self.reset, self.clock)
    }

    /// Driver-held flags, see [`DeviceFlags`]
    pub fn flags(&self) -> DeviceFlags {
        self.flags
    }
}

impl<SPI, RST, CLK> Device<SPI, RST, CLK>
where
    SPI: SpiDevice,
{
    /// Reads a single register.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn read(&mut self, addr: u8) -> Result<u8, Error> {
        let mut value = [0u8; 1];
        self.burst_read(addr, &mut value)?;
        Ok(value[0])
    }

    /// Writes a single register.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn write(&mut self, addr: u8, value: u8) -> Result<(), Error> {
        self.spi
            .transaction(&mut [Operation::Write(&[addr | WRITE_FLAG, value])])
            .map_err(|_| Error::Bus)
    }

    /// Reads `bytes.len()` bytes starting at `addr`.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn burst_read(&mut self, addr: u8, bytes: &mut [u8]) -> Result<(), Error> {
        let header = [addr & ADDRESS_MASK];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Read(bytes)])
            .map_err(|_| Error::Bus)
    }

    /// Writes `bytes` starting at `addr`.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn burst_write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Error> {
        let header = [addr | WRITE_FLAG];

        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Write(bytes)])
            .map_err(|_| Error::Bus)
    }

    /// Reads a length-prefixed block from `addr` into `bytes`.
    ///
    /// The first byte read is the declared length N. It is stored in
    /// `bytes[0]`, followed by as many of the N data bytes as fit. Data bytes
    /// that do not fit are still clocked out of the chip and dropped, so
    /// nothing of this block is left behind for the next read.
    ///
    /// The length byte is read in its own transaction. The data follows in
    /// one more transaction, plus one per further 64 dropped bytes; the FIFO
    /// read pointer is kept by the chip across chip-select cycles.
    ///
    /// # Returns
    /// Number of bytes written into `bytes`, never more than `bytes.len()`
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn burst_read_prefixed(&mut self, addr: u8, bytes: &mut [u8]) -> Result<usize, Error> {
        let declared = self.read(addr)?;
        let total = usize::from(declared);

        let (written, kept): (usize, &mut [u8]) = match bytes.split_first_mut() {
            Some((prefix, rest)) => {
                *prefix = declared;
                let kept = total.min(rest.len());
                (1 + kept, &mut rest[..kept])
            }
            None => (0, Default::default()),
        };

        let mut remaining = total - kept.len();
        if remaining > 0 {
            debug!(
                "truncating {} byte block to {} bytes",
                total,
                kept.len()
            );
        }

        let header = [addr & ADDRESS_MASK];
        let mut discard = [0u8; DRAIN_CHUNK_LEN];
        let chunk = remaining.min(DRAIN_CHUNK_LEN);
        let dropped = &mut discard[..chunk];
        remaining -= chunk;

        let result = match (kept.is_empty(), dropped.is_empty()) {
            (true, true) => return Ok(written),
            (false, true) => self
                .spi
                .transaction(&mut [Operation::Write(&header), Operation::Read(kept)]),
            (true, false) => self
                .spi
                .transaction(&mut [Operation::Write(&header), Operation::Read(dropped)]),
            (false, false) => self.spi.transaction(&mut [
                Operation::Write(&header),
                Operation::Read(kept),
                Operation::Read(dropped),
            ]),
        };
        result.map_err(|_| Error::Bus)?;

        while remaining > 0 {
            let chunk = remaining.min(DRAIN_CHUNK_LEN);
            self.spi
                .transaction(&mut [
                    Operation::Write(&header),
                    Operation::Read(&mut discard[..chunk]),
                ])
                .map_err(|_| Error::Bus)?;
            remaining -= chunk;
        }

        Ok(written)
    }

    /// Reads a register value from the device.
    ///
    /// # Type Parameters
    /// * `R` - Register type implementing ReadableRegister with u8 ID
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    /// * Any error the register's decoder converts into [`Error`], such as
    ///   `Error::InvalidMode`
    pub fn read_register<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8>,
        <R as FromByteArray>::Error: Into<Error>,
    {
        let mut raw_value = R::Array::new();
        self.burst_read(R::id(), raw_value.as_mut())?;

        R::from_bytes(raw_value).map_err(Into::into)
    }

    /// Writes a value to a device register.
    ///
    /// Multi-byte registers are written in one burst.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8>,
        <R as ToByteArray>::Error: Into<Error>,
    {
        let raw_value = register.to_bytes().map_err(Into::<Error>::into)?;

        self.burst_write(R::id(), raw_value.as_ref())
    }
}
