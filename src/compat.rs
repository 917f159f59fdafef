//! Run the driver on HALs that only implement embedded-hal 0.2.

use core::fmt::Debug;

use embedded_hal_02::blocking::delay::DelayUs;
use embedded_hal_02::blocking::i2c::{Read, Write, WriteRead};
use embedded_hal_1::delay::DelayNs;
use embedded_hal_1::i2c::{self, ErrorKind, ErrorType, I2c, Operation};

/// Error of an embedded-hal 0.2 bus. Its kind is always `Other`, so NACKs
/// surface as [`Error::I2c`](crate::Error::I2c).
#[derive(Debug)]
pub struct Eh02Error<E>(pub E);

impl<E: Debug> i2c::Error for Eh02Error<E> {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Blocking embedded-hal 0.2 I²C bus seen as an embedded-hal 1.0 `I2c`.
pub struct Eh02I2c<I> {
    bus: I,
}

impl<I> Eh02I2c<I> {
    pub fn new(bus: I) -> Self {
        Eh02I2c { bus }
    }

    pub fn release(self) -> I {
        self.bus
    }
}

impl<I, E> ErrorType for Eh02I2c<I>
where
    I: Write<Error = E> + Read<Error = E> + WriteRead<Error = E>,
    E: Debug,
{
    type Error = Eh02Error<E>;
}

impl<I, E> I2c for Eh02I2c<I>
where
    I: Write<Error = E> + Read<Error = E> + WriteRead<Error = E>,
    E: Debug,
{
    fn read(&mut self, address: u8, read: &mut [u8]) -> Result<(), Self::Error> {
        Read::read(&mut self.bus, address, read).map_err(Eh02Error)
    }

    fn write(&mut self, address: u8, write: &[u8]) -> Result<(), Self::Error> {
        Write::write(&mut self.bus, address, write).map_err(Eh02Error)
    }

    fn write_read(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        WriteRead::write_read(&mut self.bus, address, write, read).map_err(Eh02Error)
    }

    // 0.2 has no repeated-start transaction, each operation gets its own
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        for op in operations {
            let result = match op {
                Operation::Read(buf) => Read::read(&mut self.bus, address, buf),
                Operation::Write(bytes) => Write::write(&mut self.bus, address, bytes),
            };
            result.map_err(Eh02Error)?;
        }
        Ok(())
    }
}

/// embedded-hal 0.2 microsecond delay seen as `DelayNs`.
pub struct Eh02Delay<D>(pub D);

impl<D: DelayUs<u32>> DelayNs for Eh02Delay<D> {
    fn delay_ns(&mut self, ns: u32) {
        self.0.delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }

    fn delay_ms(&mut self, mut ms: u32) {
        const MAX_MS: u32 = u32::MAX / 1_000;
        while ms > MAX_MS {
            self.0.delay_us(MAX_MS * 1_000);
            ms -= MAX_MS;
        }
        self.0.delay_us(ms * 1_000);
    }
}
