//! A LIDAR-Lite on a fake bus, for tests.

use embedded_hal_1::delay::DelayNs;
use embedded_hal_1::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::register;

pub struct SimLidar {
    pub address: u8,
    pub present: bool,
    pub regs: [u8; 256],
    /// Status reads that still report busy.
    pub busy_remaining: u32,
    /// Status reads after a trigger that report busy.
    pub acquisition_polls: u32,
    /// Busy flag never clears.
    pub stuck_busy: bool,
    /// Every non-empty write is NACKed; the register pointer is kept.
    pub nack_writes: bool,
    /// Every read fails.
    pub fail_reads: bool,
    pub status_reads: u32,
    pub writes: Vec<(u8, u8)>,
    pointer: u8,
}

impl SimLidar {
    pub fn new() -> Self {
        SimLidar {
            address: 0x62,
            present: true,
            regs: [0; 256],
            busy_remaining: 0,
            acquisition_polls: 0,
            stuck_busy: false,
            nack_writes: false,
            fail_reads: false,
            status_reads: 0,
            writes: Vec::new(),
            pointer: 0,
        }
    }

    pub fn with_distance(mut self, cm: u16) -> Self {
        let [high, low] = cm.to_be_bytes();
        self.regs[0x0f] = high;
        self.regs[0x10] = low;
        self
    }

    pub fn with_acquisition_polls(mut self, polls: u32) -> Self {
        self.acquisition_polls = polls;
        self
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), ErrorKind> {
        let Some((&pointer, values)) = bytes.split_first() else {
            return Ok(());
        };
        if self.nack_writes {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        }
        self.pointer = pointer;
        for &value in values {
            self.writes.push((self.pointer, value));
            self.regs[self.pointer as usize] = value;
            if self.pointer == register::ACQ_COMMAND
                && (value == register::CMD_MEASURE || value == register::CMD_MEASURE_BIAS_CORRECTED)
            {
                self.busy_remaining = self.acquisition_polls;
            }
        }
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), ErrorKind> {
        if self.fail_reads {
            return Err(ErrorKind::Other);
        }
        for byte in buf.iter_mut() {
            *byte = if self.pointer == register::STATUS {
                self.status_reads += 1;
                if self.stuck_busy {
                    0x01
                } else if self.busy_remaining > 0 {
                    self.busy_remaining -= 1;
                    0x01
                } else {
                    0x00
                }
            } else if self.pointer & 0x80 != 0 {
                let reg = self.pointer & 0x7f;
                self.pointer = (reg + 1) | 0x80;
                self.regs[reg as usize]
            } else {
                self.regs[self.pointer as usize]
            };
        }
        Ok(())
    }
}

impl ErrorType for SimLidar {
    type Error = ErrorKind;
}

impl I2c for SimLidar {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        if !self.present || address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => self.write_bytes(bytes)?,
                Operation::Read(buf) => self.read_bytes(buf)?,
            }
        }
        Ok(())
    }
}

/// Adds up requested delays instead of sleeping.
#[derive(Default)]
pub struct CountingDelay {
    pub total_ns: u64,
}

impl CountingDelay {
    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
