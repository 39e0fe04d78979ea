//! Receiver registers
//!
//! This module contains registers for the receive chain:
//! - RSSI measurement
//! - LNA sensitivity boost
//! - Digital automatic gain control

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// RSSI value register (address: 0x24)
///
/// Absolute signal strength of the last RSSI sample, RSSI = -value / 2 dBm.
/// Updated continuously in receive mode.
#[register(0x24u8)]
#[derive(Debug, Clone, Copy, ReadableRegister)]
pub struct RssiValue {
    /// Raw sample, 0.5 dB steps
    pub raw: u8,
}

impl RssiValue {
    /// Signal strength in dBm, rounded toward zero
    pub fn dbm(self) -> i16 {
        -i16::from(self.raw) / 2
    }
}

/// Error type for LNA sensitivity conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLnaSensitivity(pub u8);

/// LNA sensitivity register (address: 0x58)
///
/// Trades current consumption for roughly 3 dB of receiver sensitivity.
#[register(0x58u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister, Default)]
pub enum LnaSensitivity {
    /// Normal sensitivity
    #[default]
    Normal,
    /// High sensitivity (boosted)
    High,
}

impl LnaSensitivity {
    /// Convert a raw byte value to LnaSensitivity
    pub fn from_byte(value: u8) -> Result<Self, InvalidLnaSensitivity> {
        match value {
            0x1B => Ok(Self::Normal),
            0x2D => Ok(Self::High),
            invalid => Err(InvalidLnaSensitivity(invalid)),
        }
    }

    /// Convert LnaSensitivity to its raw byte value
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Normal => 0x1B,
            Self::High => 0x2D,
        }
    }
}

/// Fading margin improvement register (address: 0x6F)
///
/// # Important Notes
/// - The datasheet recommends `ImprovedLowBeta0` when AFC low beta is off,
///   which is how the driver configures the chip
#[register(0x6Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, WritableRegister)]
pub enum Dagc {
    /// Normal mode
    Normal,
    /// Improved margin, for AfcLowBetaOn = 1
    ImprovedLowBeta1,
    /// Improved margin, for AfcLowBetaOn = 0
    ImprovedLowBeta0,
}

impl FromByteArray for RssiValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}

impl FromByteArray for LnaSensitivity {
    type Error = InvalidLnaSensitivity;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Self::from_byte(bytes[0])
    }
}

impl ToByteArray for LnaSensitivity {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.to_byte()])
    }
}

impl ToByteArray for Dagc {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([match self {
            Self::Normal => 0x00,
            Self::ImprovedLowBeta1 => 0x20,
            Self::ImprovedLowBeta0 => 0x30,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rssi_conversion() {
        assert_eq!(RssiValue { raw: 0 }.dbm(), 0);
        assert_eq!(RssiValue { raw: 181 }.dbm(), -90);
    }

    #[test]
    fn test_lna_sensitivity_rejects_unknown_values() {
        assert_eq!(LnaSensitivity::from_bytes([0x2D]), Ok(LnaSensitivity::High));
        assert_eq!(
            LnaSensitivity::from_bytes([0x08]),
            Err(InvalidLnaSensitivity(0x08))
        );
    }
}
