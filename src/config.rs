//! Radio configuration
//!
//! [`Device::init`] brings the chip from any state into a known configuration:
//! a hard reset followed by programming every register the driver relies on.
//! It is also the only recovery path for a radio that stopped answering mode
//! requests.
//!
//! The configuration is deliberately small. Receiver bandwidth and frequency
//! deviation are fixed at 5 kHz, which keeps the bit rate below roughly
//! 10 kbaud. Higher rates are not rejected, they just stop working.
//!
//! Network identifier and encryption key are programmed separately, see
//! [`Device::set_network_id`] and [`Device::set_key`].

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::clock::{busy_wait, Clock};
use crate::device::DeviceFlags;
use crate::packet::MAX_PAYLOAD_LEN;
use crate::registers::{
    AesKey, Bitrate, CarrierFrequency, Dagc, DataModulation, FifoThreshold, FrequencyDeviation,
    LnaSensitivity, Mode, NetworkId, Ocp, PaLevel, PacketConfig1, PacketConfig2, PayloadLength,
    SyncConfig, Version, AES_KEY_LEN, REG_SYNC_VALUE8,
};
use crate::{Device, Error};

/// Fixed frequency deviation in Hz
pub const FREQUENCY_DEVIATION_HZ: u32 = 5_000;

/// How long the reset line is held high
const RESET_PULSE_MS: u32 = 1;
/// How long the chip needs after reset before it accepts SPI traffic
const RESET_SETTLE_MS: u32 = 10;

const PROBE_PATTERNS: [u8; 2] = [0xAA, 0x55];

/// Transmitter power mode
///
/// Every mode runs its amplifiers at full output power. All modes except
/// `Normal` use the PA_BOOST pin, which only the high-power module variants
/// (RFM69HW/HCW) have wired to the antenna.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// PA0 on the RFO pin, +13 dBm
    #[default]
    Normal,
    /// PA1 on PA_BOOST, +13 dBm
    BoostNormal,
    /// PA1 and PA2 on PA_BOOST, +17 dBm
    BoostHigh,
    /// PA1 and PA2 with the high power settings, +20 dBm
    ///
    /// Transmit duty cycle must stay at or below 1%.
    BoostMax,
}

impl PowerMode {
    /// PA level register value for this mode
    pub fn pa_level(self) -> PaLevel {
        let (pa0, pa1, pa2) = match self {
            Self::Normal => (true, false, false),
            Self::BoostNormal => (false, true, false),
            Self::BoostHigh | Self::BoostMax => (false, true, true),
        };
        PaLevel {
            pa0,
            pa1,
            pa2,
            output_power: 0x1F,
        }
    }

    /// Over-current protection setting for this mode
    pub fn ocp(self) -> Ocp {
        match self {
            Self::BoostMax => Ocp::DISABLED,
            _ => Ocp::default(),
        }
    }
}

/// Radio configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Carrier frequency in kHz
    pub freq_khz: u32,
    /// Bit rate in baud. Should not exceed 10 kbaud, see the module docs.
    pub baud_rate: u16,
    /// Boost receiver sensitivity
    pub rx_boost: bool,
    /// Transmitter power mode
    pub tx_power: PowerMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            freq_khz: 868_000,
            baud_rate: 4_800,
            rx_boost: false,
            tx_power: PowerMode::Normal,
        }
    }
}

impl<SPI, RST, CLK> Device<SPI, RST, CLK>
where
    SPI: SpiDevice,
    RST: OutputPin,
    CLK: Clock,
{
    /// Resets and configures the radio.
    ///
    /// Must be called before anything else, and again to recover a radio
    /// that stopped responding. The driver flags are rebuilt from `config`
    /// and idle mode is requested (not awaited).
    ///
    /// # Errors
    /// * `Error::Pin` - the reset line could not be driven
    /// * `Error::Bus` - SPI communication failed
    pub fn init(&mut self, config: &Config) -> Result<(), Error> {
        debug!("init {} kHz, {} baud", config.freq_khz, config.baud_rate);
        self.hard_reset()?;

        self.write_register(DataModulation::default())?;
        self.write_register(Bitrate::from_baud(config.baud_rate))?;
        self.write_register(FrequencyDeviation::from_hz(FREQUENCY_DEVIATION_HZ))?;
        self.write_register(CarrierFrequency::from_khz(config.freq_khz))?;
        self.write_register(config.tx_power.pa_level())?;
        self.write_register(config.tx_power.ocp())?;
        self.write_register(if config.rx_boost {
            LnaSensitivity::High
        } else {
            LnaSensitivity::Normal
        })?;
        self.write_register(SyncConfig::default())?;
        self.write_register(PacketConfig1 {
            variable_length: true,
            ..Default::default()
        })?;
        self.write_register(PayloadLength {
            length: MAX_PAYLOAD_LEN as u8,
        })?;
        self.write_register(FifoThreshold::default())?;
        self.write_register(Dagc::ImprovedLowBeta0)?;

        self.flags = DeviceFlags {
            last_requested_mode: Mode::Idle,
            boost_enabled: config.rx_boost,
            high_power: config.tx_power == PowerMode::BoostMax,
        };

        self.request_mode(Mode::Idle)
    }

    fn hard_reset(&mut self) -> Result<(), Error> {
        self.reset.set_high().map_err(|_| Error::Pin)?;
        busy_wait(&mut self.clock, RESET_PULSE_MS);
        self.reset.set_low().map_err(|_| Error::Pin)?;
        busy_wait(&mut self.clock, RESET_SETTLE_MS);
        Ok(())
    }
}

impl<SPI, RST, CLK> Device<SPI, RST, CLK>
where
    SPI: SpiDevice,
{
    /// Checks whether a radio answers on the bus.
    ///
    /// Writes two complementary patterns to a spare sync word register and
    /// reads each back. A missing chip, a floating MISO line or swapped wires
    /// all fail this check.
    ///
    /// # Returns
    /// `true` if both patterns read back unchanged
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn probe(&mut self) -> Result<bool, Error> {
        for pattern in PROBE_PATTERNS {
            self.write(REG_SYNC_VALUE8, pattern)?;
            let readback = self.read(REG_SYNC_VALUE8)?;
            if readback != pattern {
                warn!("probe wrote {} but read {}", pattern, readback);
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Reads the silicon revision
    pub fn version(&mut self) -> Result<u8, Error> {
        Ok(self.read_register::<Version>()?.revision)
    }

    /// Sets the network identifier.
    ///
    /// Nodes only receive packets from nodes with the same identifier.
    pub fn set_network_id(&mut self, id: u32) -> Result<(), Error> {
        self.write_register(NetworkId { id })
    }

    /// Sets or clears the AES key.
    ///
    /// `Some(key)` loads the key and turns encryption on. `None` overwrites
    /// the key with zeros and turns encryption off. All nodes of a network
    /// must use the same key.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn set_key(&mut self, key: Option<&[u8; AES_KEY_LEN]>) -> Result<(), Error> {
        self.write_register(AesKey {
            key: key.copied().unwrap_or_default(),
        })?;

        let mut packet_config = self.read_register::<PacketConfig2>()?;
        packet_config.aes_on = key.is_some();
        self.write_register(packet_config)
    }

    /// Whether AES encryption is currently enabled
    pub fn key_enabled(&mut self) -> Result<bool, Error> {
        Ok(self.read_register::<PacketConfig2>()?.aes_on)
    }
}
