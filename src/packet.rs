//! Packet transfer
//!
//! Packets use the chip's variable length format: the first FIFO byte is the
//! payload length L, followed by L payload bytes. A packet buffer handed to or
//! returned from this module has exactly that layout.
//!
//! Loading the FIFO and starting the transmitter are separate steps;
//! [`Device::send_packet`] combines them with a wait for the PacketSent flag.

use embedded_hal::spi::SpiDevice;

use crate::clock::Clock;
use crate::registers::{EventFlags, RssiValue, REG_FIFO};
use crate::{Device, Error};

/// Largest payload, excluding the length byte
pub const MAX_PAYLOAD_LEN: usize = 64;

/// Largest packet buffer, including the length byte
pub const MAX_PACKET_LEN: usize = MAX_PAYLOAD_LEN + 1;

/// Default time allowed for a packet to leave the transmitter
pub const PACKET_SEND_TIMEOUT_MS: u32 = 4000;

impl<SPI, RST, CLK> Device<SPI, RST, CLK>
where
    SPI: SpiDevice,
    CLK: Clock,
{
    /// Loads a packet into the FIFO.
    ///
    /// `packet[0]` is the payload length L, at most 64; exactly `1 + L`
    /// bytes are written, anything after them is ignored. Should be called in
    /// idle mode. Nothing is transmitted until the radio enters transmit mode.
    ///
    /// # Errors
    /// * `Error::InvalidPacket` - empty buffer, L above 64, or fewer than L
    ///   payload bytes supplied; the bus is not touched
    /// * `Error::Bus` - SPI communication failed
    pub fn write_packet(&mut self, packet: &[u8]) -> Result<(), Error> {
        let len = packet.first().copied().unwrap_or(0);
        let total = usize::from(len) + 1;

        if packet.is_empty() || usize::from(len) > MAX_PAYLOAD_LEN || packet.len() < total {
            return Err(Error::InvalidPacket { len });
        }

        self.burst_write(REG_FIFO, &packet[..total])
    }

    /// Reads a received packet from the FIFO into `packet`.
    ///
    /// `packet[0]` receives the declared payload length, the payload follows.
    /// A payload that does not fit is cut short without notice; the rest of
    /// it is read out and dropped. Compare the returned count with
    /// `packet[0] + 1` to detect this.
    ///
    /// # Returns
    /// Number of bytes written into `packet`
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn read_packet(&mut self, packet: &mut [u8]) -> Result<usize, Error> {
        self.burst_read_prefixed(REG_FIFO, packet)
    }

    /// Loads `packet`, switches to transmit and waits for PacketSent.
    ///
    /// # Returns
    /// `true` only if both the mode switch and the PacketSent wait succeed.
    /// On `false` the radio is left in whatever state it reached; there is
    /// no retry and no return to idle.
    ///
    /// # Errors
    /// Same as [`write_packet`](Device::write_packet)
    pub fn send_packet(&mut self, packet: &[u8]) -> Result<bool, Error> {
        self.write_packet(packet)?;

        if !self.start_tx()? {
            return Ok(false);
        }

        self.wait_event(EventFlags::PACKET_SENT, PACKET_SEND_TIMEOUT_MS)
    }

    /// Whether the last packet has been sent. Only meaningful in transmit mode.
    pub fn packet_sent(&mut self) -> Result<bool, Error> {
        Ok(self.read_events()?.contains(EventFlags::PACKET_SENT))
    }

    /// Whether a received packet is waiting in the FIFO.
    pub fn packet_received(&mut self) -> Result<bool, Error> {
        Ok(self.read_events()?.contains(EventFlags::PAYLOAD_READY))
    }

    /// Signal strength of the last RSSI sample in dBm.
    pub fn rssi(&mut self) -> Result<i16, Error> {
        Ok(self.read_register::<RssiValue>()?.dbm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::Mode;
    use crate::testing::{FakeRadio, NoopPin, StepClock};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    #[test]
    fn test_written_packet_reads_back_unchanged() {
        let mut radio = FakeRadio::new();
        let mut dev = Device::new(&mut radio, NoopPin, StepClock::new(0, 1));
        let packet = [5, b'h', b'e', b'l', b'l', b'o'];

        dev.write_packet(&packet).unwrap();
        let mut buf = [0u8; MAX_PACKET_LEN];
        let n = dev.read_packet(&mut buf).unwrap();

        assert_eq!(n, packet.len());
        assert_eq!(&buf[..n], &packet);
    }

    #[test]
    fn test_only_declared_length_is_written() {
        let spi = SpiMock::new(&[
            SpiTransaction::transaction_start(),
            SpiTransaction::write(0x80),
            SpiTransaction::write_vec(vec![2, 0xAA, 0xBB]),
            SpiTransaction::transaction_end(),
        ]);
        let mut dev = Device::new(spi, NoopPin, StepClock::new(0, 1));

        dev.write_packet(&[2, 0xAA, 0xBB, 0xCC, 0xDD]).unwrap();
        dev.release().0.done();
    }

    #[test]
    fn test_malformed_packets_are_rejected_before_the_bus() {
        let spi = SpiMock::<u8>::new(&[]);
        let mut dev = Device::new(spi, NoopPin, StepClock::new(0, 1));

        let mut oversized = [0u8; 66];
        oversized[0] = 65;
        assert_eq!(
            dev.write_packet(&oversized),
            Err(Error::InvalidPacket { len: 65 })
        );
        assert_eq!(
            dev.write_packet(&[4, 1, 2]),
            Err(Error::InvalidPacket { len: 4 })
        );
        assert_eq!(dev.write_packet(&[]), Err(Error::InvalidPacket { len: 0 }));
        dev.release().0.done();
    }

    #[test]
    fn test_short_buffer_truncates_and_drains() {
        let mut radio = FakeRadio::new();
        let payload: Vec<u8> = (100..164).collect();
        radio.receive(&payload);

        {
            let mut dev = Device::new(&mut radio, NoopPin, StepClock::new(0, 1));
            assert!(dev.packet_received().unwrap());

            let mut buf = [0u8; 4];
            assert_eq!(dev.read_packet(&mut buf).unwrap(), 4);
            assert_eq!(buf, [64, 100, 101, 102]);
            assert!(!dev.packet_received().unwrap());
        }

        assert!(radio.fifo.is_empty());
    }

    #[test]
    fn test_oversized_block_is_fully_drained() {
        let mut radio = FakeRadio::new();
        let oversized: Vec<u8> = (0..70).collect();
        radio.receive(&oversized);
        radio.receive(&[0xA1, 0xA2]);

        {
            let mut dev = Device::new(&mut radio, NoopPin, StepClock::new(0, 1));

            let mut buf = [0u8; 4];
            assert_eq!(dev.read_packet(&mut buf).unwrap(), 4);
            assert_eq!(buf, [70, 0, 1, 2]);

            let mut buf = [0u8; MAX_PACKET_LEN];
            assert_eq!(dev.read_packet(&mut buf).unwrap(), 3);
            assert_eq!(&buf[..3], &[2, 0xA1, 0xA2]);
        }

        assert!(radio.fifo.is_empty());
    }

    #[test]
    fn test_send_packet_confirms_transmission() {
        let mut radio = FakeRadio::new();
        radio.auto_send = true;

        {
            let mut dev = Device::new(&mut radio, NoopPin, StepClock::new(0, 1));
            assert!(dev.send_packet(&[3, 1, 2, 3]).unwrap());
            assert!(dev.packet_sent().unwrap());
            assert_eq!(dev.current_mode().unwrap(), Mode::Transmit);
        }

        assert_eq!(radio.transmitted, vec![3, 1, 2, 3]);
    }

    #[test]
    fn test_send_packet_times_out_without_retry() {
        let mut radio = FakeRadio::new();
        let mut clock = StepClock::new(0, 1);

        {
            let mut dev = Device::new(&mut radio, NoopPin, &mut clock);
            assert!(!dev.send_packet(&[2, 0x55, 0xAA]).unwrap());
            assert!(!dev.packet_sent().unwrap());
        }

        assert!(clock.now >= PACKET_SEND_TIMEOUT_MS);
        assert!(clock.now < 2 * PACKET_SEND_TIMEOUT_MS);
        // One FIFO load, one transmit request
        assert_eq!(radio.writes_to(0x00), vec![2, 0x55, 0xAA]);
        assert_eq!(radio.writes_to(0x01), vec![0x0C]);
    }

    #[test]
    fn test_send_packet_fails_when_transmitter_never_starts() {
        let mut radio = FakeRadio::new();
        radio.stuck = true;
        radio.auto_send = true;
        let mut clock = StepClock::new(0, 1);

        {
            let mut dev = Device::new(&mut radio, NoopPin, &mut clock);
            assert!(!dev.send_packet(&[1, 0x42]).unwrap());
            assert_eq!(dev.last_requested_mode(), Mode::Transmit);
        }

        // Gave up after the mode switch, never waited for PacketSent
        assert!(clock.now < PACKET_SEND_TIMEOUT_MS);
        assert!(radio.transmitted.is_empty());
    }

    #[test]
    fn test_rssi_reads_half_db_steps() {
        let mut radio = FakeRadio::new();
        radio.regs[0x24] = 120;
        let mut dev = Device::new(&mut radio, NoopPin, StepClock::new(0, 1));

        assert_eq!(dev.rssi().unwrap(), -60);
    }
}
