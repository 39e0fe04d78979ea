//! Test doubles shared by the unit tests.
//!
//! `embedded-hal-mock` covers exact wire expectations. Behaviour that depends
//! on the chip reacting to earlier writes (mode transitions, FIFO contents,
//! event flags) is easier to express against [`FakeRadio`], a small model of
//! the register file.

use std::collections::VecDeque;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, Operation, SpiDevice};

use crate::clock::Clock;

const REG_OP_MODE: u8 = 0x01;
const REG_IRQ_FLAGS2: u8 = 0x28;
const MODE_MASK: u8 = 0x1C;
const TRANSMIT_BITS: u8 = 3 << 2;
const PACKET_SENT: u8 = 1 << 3;
const PAYLOAD_READY: u8 = 1 << 2;

/// Clock that advances by `step` milliseconds on every reading.
#[derive(Debug)]
pub(crate) struct StepClock {
    pub now: u32,
    pub step: u32,
    pub reads: u32,
}

impl StepClock {
    pub fn new(start: u32, step: u32) -> Self {
        Self {
            now: start,
            step,
            reads: 0,
        }
    }
}

impl Clock for StepClock {
    fn now_ms(&mut self) -> u32 {
        let now = self.now;
        self.now = self.now.wrapping_add(self.step);
        self.reads += 1;
        now
    }
}

/// Reset line that accepts everything.
#[derive(Debug)]
pub(crate) struct NoopPin;

impl PinErrorType for NoopPin {
    type Error = Infallible;
}

impl OutputPin for NoopPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Register file model of the radio.
///
/// - Burst accesses auto-increment the address, except on the FIFO
/// - A mode request becomes visible after `mode_lag` reads of the mode
///   register, or never when `stuck` is set
/// - With `auto_send`, entering transmit moves the FIFO into `transmitted`
///   and raises PacketSent; leaving transmit clears it again
/// - PayloadReady follows the FIFO: set by [`FakeRadio::receive`], cleared
///   once the FIFO is empty
#[derive(Debug)]
pub(crate) struct FakeRadio {
    pub regs: [u8; 128],
    pub fifo: VecDeque<u8>,
    pub transmitted: Vec<u8>,
    pub writes: Vec<(u8, u8)>,
    pub mode_lag: u32,
    pub stuck: bool,
    pub auto_send: bool,
    requested: u8,
    lag_left: u32,
}

impl FakeRadio {
    pub fn new() -> Self {
        let mut regs = [0u8; 128];
        regs[REG_OP_MODE as usize] = 1 << 2;
        Self {
            regs,
            fifo: VecDeque::new(),
            transmitted: Vec::new(),
            writes: Vec::new(),
            mode_lag: 0,
            stuck: false,
            auto_send: false,
            requested: 1 << 2,
            lag_left: 0,
        }
    }

    /// Puts a received packet into the FIFO
    pub fn receive(&mut self, payload: &[u8]) {
        self.fifo.push_back(payload.len() as u8);
        self.fifo.extend(payload.iter().copied());
        self.regs[REG_IRQ_FLAGS2 as usize] |= PAYLOAD_READY;
    }

    /// Values written to `addr`, oldest first
    pub fn writes_to(&self, addr: u8) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    fn apply_mode(&mut self) {
        let previous = self.regs[REG_OP_MODE as usize] & MODE_MASK;
        self.regs[REG_OP_MODE as usize] = self.requested;
        let current = self.requested & MODE_MASK;

        if current == TRANSMIT_BITS && previous != TRANSMIT_BITS && self.auto_send {
            if !self.fifo.is_empty() {
                self.transmitted.extend(self.fifo.drain(..));
                self.regs[REG_IRQ_FLAGS2 as usize] |= PACKET_SENT;
            }
        } else if current != TRANSMIT_BITS {
            self.regs[REG_IRQ_FLAGS2 as usize] &= !PACKET_SENT;
        }
    }

    fn load(&mut self, addr: u8) -> u8 {
        match addr {
            0x00 => {
                let value = self.fifo.pop_front().unwrap_or(0);
                if self.fifo.is_empty() {
                    self.regs[REG_IRQ_FLAGS2 as usize] &= !PAYLOAD_READY;
                }
                value
            }
            REG_OP_MODE => {
                if !self.stuck {
                    if self.lag_left == 0 {
                        self.apply_mode();
                    } else {
                        self.lag_left -= 1;
                    }
                }
                self.regs[REG_OP_MODE as usize]
            }
            _ => self.regs[addr as usize],
        }
    }

    fn store(&mut self, addr: u8, value: u8) {
        self.writes.push((addr, value));
        match addr {
            0x00 => self.fifo.push_back(value),
            REG_OP_MODE => {
                self.requested = value;
                self.lag_left = self.mode_lag;
            }
            _ => self.regs[addr as usize] = value,
        }
    }
}

impl SpiErrorType for FakeRadio {
    type Error = Infallible;
}

impl SpiDevice for FakeRadio {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut cursor: Option<(u8, bool)> = None;

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let mut bytes = bytes.iter().copied();
                    if cursor.is_none() {
                        let header = bytes.next().expect("transaction without address byte");
                        cursor = Some((header & 0x7F, header & 0x80 != 0));
                    }
                    for value in bytes {
                        let (addr, is_write) = cursor.expect("address byte");
                        assert!(is_write, "data written during a read access");
                        self.store(addr, value);
                        if addr != 0x00 {
                            cursor = Some((addr + 1, is_write));
                        }
                    }
                }
                Operation::Read(buf) => {
                    let (mut addr, is_write) = cursor.expect("read before address byte");
                    assert!(!is_write, "data read during a write access");
                    for slot in buf.iter_mut() {
                        *slot = self.load(addr);
                        if addr != 0x00 {
                            addr += 1;
                        }
                    }
                    cursor = Some((addr, is_write));
                }
                _ => unimplemented!("operation not used by the driver"),
            }
        }

        Ok(())
    }
}
