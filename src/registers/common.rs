//! Common configuration registers
//!
//! This module contains the registers at the bottom of the map that control:
//! - The operating mode
//! - Data processing mode and modulation scheme
//! - Bit rate and frequency deviation
//! - Carrier frequency
//! - Silicon revision

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Crystal oscillator frequency in Hz
pub const FXOSC_HZ: u32 = 32_000_000;

/// Error type for invalid operating mode values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMode(pub u8);

/// Operating mode of the transceiver
///
/// The discriminant is the value of the 3-bit mode field in [`OpMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Lowest power mode, oscillator off
    Sleep = 0,
    /// Standby: oscillator running, ready for configuration and FIFO access
    #[default]
    Idle = 1,
    /// Frequency synthesizer running (FS mode)
    Intermediate = 2,
    /// Transmitting the FIFO content
    Transmit = 3,
    /// Receiving into the FIFO
    Receive = 4,
}

impl TryFrom<u8> for Mode {
    type Error = InvalidMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Sleep),
            1 => Ok(Self::Idle),
            2 => Ok(Self::Intermediate),
            3 => Ok(Self::Transmit),
            4 => Ok(Self::Receive),
            invalid => Err(InvalidMode(invalid)),
        }
    }
}

/// Operating mode register (address: 0x01)
///
/// Writing the mode field requests a transition; reading it returns the mode
/// the chip is actually in. The two differ while a transition is in progress.
///
/// # Important Notes
/// - The sequencer must stay on for automatic TX/RX handling
/// - Transitions out of sleep take longest since the oscillator has to start
/// - Values 5-7 in the mode field are reserved
#[register(0x01u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct OpMode {
    /// Disable the automatic sequencer
    pub sequencer_off: bool,
    /// Enable listen mode
    pub listen_on: bool,
    /// Operating mode (bits 4:2)
    pub mode: Mode,
}

impl OpMode {
    /// Mode request with the sequencer on and listen mode off
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

/// Modulation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modulation {
    /// Frequency shift keying
    #[default]
    Fsk = 0,
    /// On-off keying
    Ook = 1,
}

/// Data modulation register (address: 0x02)
///
/// The driver always runs the chip in packet mode; the continuous modes are
/// not representable.
#[register(0x02u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default)]
pub struct DataModulation {
    /// Modulation scheme (bits 4:3)
    pub modulation: Modulation,
    /// Modulation shaping (bits 1:0), 0 = no shaping
    pub shaping: u8,
}

/// Bit rate register (address: 0x03)
///
/// BitRate = FXOSC / value
#[register(0x03u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
pub struct Bitrate {
    /// Oscillator cycles per bit
    /// Default: 0x1A0B (4.8 kbps)
    pub value: u16,
}

impl Default for Bitrate {
    fn default() -> Self {
        Self { value: 0x1A0B }
    }
}

impl Bitrate {
    /// Register value for `baud` bits per second.
    ///
    /// Rates below 489 baud do not fit the register and saturate.
    pub fn from_baud(baud: u16) -> Self {
        let value = FXOSC_HZ / u32::from(baud.max(1));
        Self {
            value: u16::try_from(value).unwrap_or(u16::MAX),
        }
    }
}

/// Frequency deviation register (address: 0x05)
///
/// Fdev = Fstep * value, Fstep = FXOSC / 2^19 (~61 Hz)
#[register(0x05u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
pub struct FrequencyDeviation {
    /// Deviation in synthesizer steps (14 bits)
    /// Default: 0x0052 (5 kHz)
    pub value: u16,
}

impl Default for FrequencyDeviation {
    fn default() -> Self {
        Self { value: 0x0052 }
    }
}

impl FrequencyDeviation {
    /// Register value closest to `hz`
    pub fn from_hz(hz: u32) -> Self {
        let steps = ((u64::from(hz) << 19) + u64::from(FXOSC_HZ / 2)) / u64::from(FXOSC_HZ);
        Self {
            value: (steps as u16) & 0x3FFF,
        }
    }
}

/// Carrier frequency register (address: 0x07)
///
/// Frf = Fstep * value. The frequency only changes once the LSB (0x09) is
/// written, so the whole register is always written as one burst.
#[register(0x07u8)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister)]
pub struct CarrierFrequency {
    /// 24-bit synthesizer word
    /// Default: 0xE4C000 (915 MHz)
    pub frf: u32,
}

impl Default for CarrierFrequency {
    fn default() -> Self {
        Self { frf: 0xE4_C000 }
    }
}

impl CarrierFrequency {
    /// Register value for a carrier of `khz` kilohertz
    pub fn from_khz(khz: u32) -> Self {
        let frf = ((u64::from(khz) << 19) + u64::from(FXOSC_HZ / 2_000)) / u64::from(FXOSC_HZ / 1_000);
        Self {
            frf: (frf as u32) & 0x00FF_FFFF,
        }
    }
}

/// Version register (address: 0x10)
///
/// Silicon revision. Reads 0x24 on current RFM69 modules.
#[register(0x10u8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
pub struct Version {
    /// Full revision byte, bits 7:4 = revision, 3:0 = metal mask
    pub revision: u8,
}

impl FromByteArray for OpMode {
    type Error = InvalidMode;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            sequencer_off: bytes[0] & 0x80 != 0,
            listen_on: bytes[0] & 0x40 != 0,
            mode: Mode::try_from((bytes[0] >> 2) & 0x07)?,
        })
    }
}

impl ToByteArray for OpMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.sequencer_off as u8) << 7 | (self.listen_on as u8) << 6 | (self.mode as u8) << 2])
    }
}

impl FromByteArray for DataModulation {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            modulation: if bytes[0] & 0x08 != 0 {
                Modulation::Ook
            } else {
                Modulation::Fsk
            },
            shaping: bytes[0] & 0x03,
        })
    }
}

impl ToByteArray for DataModulation {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.modulation as u8) << 3 | (self.shaping & 0x03)])
    }
}

impl FromByteArray for Bitrate {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for Bitrate {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.value.to_be_bytes())
    }
}

impl FromByteArray for FrequencyDeviation {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u16::from_be_bytes(bytes) & 0x3FFF,
        })
    }
}

impl ToByteArray for FrequencyDeviation {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok((self.value & 0x3FFF).to_be_bytes())
    }
}

impl FromByteArray for CarrierFrequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            frf: u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
        })
    }
}

impl ToByteArray for CarrierFrequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [_, msb, mid, lsb] = self.frf.to_be_bytes();
        Ok([msb, mid, lsb])
    }
}

impl FromByteArray for Version {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { revision: bytes[0] })
    }
}
