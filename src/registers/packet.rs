//! Packet engine registers
//!
//! This module contains registers for configuring packet handling including:
//! - Sync word detection (used as the network identifier)
//! - Packet format and CRC
//! - FIFO threshold and transmit start condition
//! - AES encryption
//!
//! These registers must be configured identically on every node of a network,
//! otherwise packets are silently dropped by the receiving packet engine.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// AES key length in bytes
pub const AES_KEY_LEN: usize = 16;

/// Sync word configuration register (address: 0x2E)
///
/// # Important Notes
/// - The sync word size is stored as size - 1 (bits 5:3)
/// - `tolerance` is the number of bit errors accepted in the sync word
#[register(0x2Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SyncConfig {
    /// Enable sync word generation and detection
    pub sync_on: bool,
    /// Fill the FIFO only while the fill condition bit is set
    pub fifo_fill_condition: bool,
    /// Sync word size in bytes, 1-8
    pub size: u8,
    /// Tolerated bit errors, 0-7
    pub tolerance: u8,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sync_on: true,
            fifo_fill_condition: false,
            size: 4,
            tolerance: 0,
        }
    }
}

/// Network identifier (address: 0x2F)
///
/// First four sync word bytes (SyncValue1-4). Receivers only accept packets
/// whose sync word matches, which filters out foreign traffic and noise.
#[register(0x2Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct NetworkId {
    /// Identifier, sent MSB first
    pub id: u32,
}

/// Packet configuration 1 register (address: 0x37)
///
/// # Important Notes
/// - Variable length packets carry their length as the first FIFO byte
/// - With CRC auto clear on, a packet with a bad CRC never raises
///   PayloadReady and the FIFO is flushed by the chip
#[register(0x37u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketConfig1 {
    /// Variable length format
    pub variable_length: bool,
    /// Enable CRC generation and check
    pub crc_on: bool,
    /// Keep packets with a failed CRC
    pub crc_auto_clear_off: bool,
}

impl Default for PacketConfig1 {
    fn default() -> Self {
        Self {
            variable_length: false,
            crc_on: true,
            crc_auto_clear_off: false,
        }
    }
}

/// Payload length register (address: 0x38)
///
/// In variable length mode this is the largest length accepted by the
/// receiver.
#[register(0x38u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PayloadLength {
    /// Length in bytes
    pub length: u8,
}

/// FIFO threshold register (address: 0x3C)
#[register(0x3Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FifoThreshold {
    /// Start transmitting as soon as the FIFO is not empty, instead of
    /// waiting for the level threshold
    pub tx_start_on_not_empty: bool,
    /// FIFO level threshold, 0-127
    pub threshold: u8,
}

impl Default for FifoThreshold {
    fn default() -> Self {
        Self {
            tx_start_on_not_empty: true,
            threshold: 0x0F,
        }
    }
}

/// Packet configuration 2 register (address: 0x3D)
///
/// # Important Notes
/// - The RestartRx bit (bit 2) is a write trigger and always written as 0
/// - AES only applies to payloads of at most 64 bytes
#[register(0x3Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PacketConfig2 {
    /// Delay before restarting RX after PayloadReady, 2^value bit periods
    pub inter_packet_rx_delay: u8,
    /// Restart the receiver automatically after the FIFO was emptied
    pub auto_rx_restart: bool,
    /// Enable AES encryption/decryption
    pub aes_on: bool,
}

impl Default for PacketConfig2 {
    fn default() -> Self {
        Self {
            inter_packet_rx_delay: 0,
            auto_rx_restart: true,
            aes_on: false,
        }
    }
}

/// AES key register (address: 0x3E)
///
/// Write only: the chip returns zeros when the key is read.
#[register(0x3Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, WritableRegister, Default)]
pub struct AesKey {
    /// Key bytes, AesKey1 first
    pub key: [u8; AES_KEY_LEN],
}

impl FromByteArray for SyncConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            sync_on: bytes[0] & 0x80 != 0,
            fifo_fill_condition: bytes[0] & 0x40 != 0,
            size: ((bytes[0] >> 3) & 0x07) + 1,
            tolerance: bytes[0] & 0x07,
        })
    }
}

impl ToByteArray for SyncConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.sync_on as u8) << 7
            | (self.fifo_fill_condition as u8) << 6
            | (self.size.saturating_sub(1) & 0x07) << 3
            | (self.tolerance & 0x07)])
    }
}

impl FromByteArray for NetworkId {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            id: u32::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for NetworkId {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.id.to_be_bytes())
    }
}

impl FromByteArray for PacketConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            variable_length: bytes[0] & 0x80 != 0,
            crc_on: bytes[0] & 0x10 != 0,
            crc_auto_clear_off: bytes[0] & 0x08 != 0,
        })
    }
}

impl ToByteArray for PacketConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.variable_length as u8) << 7
            | (self.crc_on as u8) << 4
            | (self.crc_auto_clear_off as u8) << 3])
    }
}

impl FromByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { length: bytes[0] })
    }
}

impl ToByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.length])
    }
}

impl FromByteArray for FifoThreshold {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            tx_start_on_not_empty: bytes[0] & 0x80 != 0,
            threshold: bytes[0] & 0x7F,
        })
    }
}

impl ToByteArray for FifoThreshold {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.tx_start_on_not_empty as u8) << 7 | (self.threshold & 0x7F)])
    }
}

impl FromByteArray for PacketConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            inter_packet_rx_delay: bytes[0] >> 4,
            auto_rx_restart: bytes[0] & 0x02 != 0,
            aes_on: bytes[0] & 0x01 != 0,
        })
    }
}

impl ToByteArray for PacketConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.inter_packet_rx_delay & 0x0F) << 4
            | (self.auto_rx_restart as u8) << 1
            | self.aes_on as u8])
    }
}

impl ToByteArray for AesKey {
    type Error = Infallible;
    type Array = [u8; AES_KEY_LEN];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.key)
    }
}
