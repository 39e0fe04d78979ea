//! Transmitter registers
//!
//! This module contains registers for the power amplifier chain:
//! - PA selection and output power
//! - Over-current protection
//! - High power test registers for +20 dBm operation
//!
//! PA1 and PA2 drive the PA_BOOST pin, which is only bonded out on the
//! high-power module variants (RFM69HW/HCW). Selecting them on a standard
//! module produces no RF output.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// PA level register (address: 0x11)
///
/// Selects which amplifiers are enabled and the output power.
///
/// # Output Power
/// - PA0 only (RFO pin): -18 + output_power dBm
/// - PA1 only: -18 + output_power dBm, up to +13 dBm
/// - PA1 + PA2: -14 + output_power dBm, up to +17 dBm
/// - PA1 + PA2 with high power settings: -11 + output_power dBm, up to +20 dBm
#[register(0x11u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PaLevel {
    /// Enable PA0 (RFO pin)
    pub pa0: bool,
    /// Enable PA1 (PA_BOOST pin)
    pub pa1: bool,
    /// Enable PA2 (PA_BOOST pin)
    pub pa2: bool,
    /// Output power setting, 0-31
    pub output_power: u8,
}

impl Default for PaLevel {
    fn default() -> Self {
        Self {
            pa0: true,
            pa1: false,
            pa2: false,
            output_power: 0x1F,
        }
    }
}

/// Over-current protection register (address: 0x13)
///
/// Imax = 45 + 5 * trim mA
///
/// # Important Notes
/// - Must be disabled when the high power settings are active
/// - Default: enabled, trim 0xA (95 mA)
#[register(0x13u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Ocp {
    /// Enable over-current protection
    pub enabled: bool,
    /// Current limit trim, 0-15
    pub trim: u8,
}

impl Default for Ocp {
    fn default() -> Self {
        Self {
            enabled: true,
            trim: 0x0A,
        }
    }
}

impl Ocp {
    /// Protection off, as required for +20 dBm operation
    pub const DISABLED: Self = Self {
        enabled: false,
        trim: 0x0F,
    };
}

/// High power PA test register 1 (address: 0x5A)
///
/// Must be set to [`TestPa1::HIGH_POWER`] while transmitting at +20 dBm and
/// back to [`TestPa1::NORMAL`] in every other mode, otherwise the receiver
/// can be damaged.
#[register(0x5Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct TestPa1 {
    /// Raw register value
    pub value: u8,
}

impl TestPa1 {
    /// Normal mode and receive value
    pub const NORMAL: Self = Self { value: 0x55 };
    /// +20 dBm transmit value
    pub const HIGH_POWER: Self = Self { value: 0x5D };
}

/// High power PA test register 2 (address: 0x5C)
///
/// Companion of [`TestPa1`]; both are always switched together.
#[register(0x5Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct TestPa2 {
    /// Raw register value
    pub value: u8,
}

impl TestPa2 {
    /// Normal mode and receive value
    pub const NORMAL: Self = Self { value: 0x70 };
    /// +20 dBm transmit value
    pub const HIGH_POWER: Self = Self { value: 0x7C };
}

impl FromByteArray for PaLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            pa0: bytes[0] & 0x80 != 0,
            pa1: bytes[0] & 0x40 != 0,
            pa2: bytes[0] & 0x20 != 0,
            output_power: bytes[0] & 0x1F,
        })
    }
}

impl ToByteArray for PaLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.pa0 as u8) << 7
            | (self.pa1 as u8) << 6
            | (self.pa2 as u8) << 5
            | (self.output_power & 0x1F)])
    }
}

impl FromByteArray for Ocp {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            enabled: bytes[0] & 0x10 != 0,
            trim: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for Ocp {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.enabled as u8) << 4 | (self.trim & 0x0F)])
    }
}

impl FromByteArray for TestPa1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for TestPa1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for TestPa2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for TestPa2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}
