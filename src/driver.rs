use embedded_hal_1::{delay::DelayNs, i2c::I2c};

use crate::config::{BusyWait, Config, Settings};
use crate::register::{self, Address, Profile, Status};
use crate::Error;

/// Settle time after every register write, needed between back-to-back bus
/// operations.
const WRITE_SETTLE_MS: u32 = 1;
/// Re-initialization time after a reset.
pub const RESET_DELAY_MS: u32 = 22;
const MAX_READ_LEN: usize = 2;

/// Garmin LIDAR-Lite v3 laser rangefinder.
///
/// - Output: distance in centimeters
/// - Range: 0 to 65535
/// - Address(7bit): 0x62 by default, any even value after reassignment
///
/// The device address is passed on every call, so one driver can reach
/// several sensors on the same bus.
pub struct LidarLite<I2C, D> {
    i2c: I2C,
    delay: D,
    settings: Settings,
}

impl<I2C, D> LidarLite<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_settings(i2c, delay, Settings::default())
    }

    pub fn with_settings(i2c: I2C, delay: D, settings: Settings) -> Self {
        LidarLite { i2c, delay, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Applies the configured profile.
    ///
    /// The bus must already be running at [`Config::bus_frequency_hz`].
    pub fn init(&mut self, config: &Config) -> Result<(), Error<I2C::Error>> {
        debug!(
            "init {:#x}: profile {}, bus at {} Hz",
            config.address.get(),
            config.profile.index(),
            config.bus_frequency_hz()
        );
        self.configure(config.profile, config.address)
    }

    /// Checks that the device answers, then writes the profile's registers.
    pub fn configure(&mut self, profile: Profile, address: Address) -> Result<(), Error<I2C::Error>> {
        self.ping(address)?;
        self.apply(profile, address)
    }

    /// Like [`configure`](Self::configure), with a raw profile number.
    ///
    /// Numbers outside 0..=5 fail with [`Error::UnknownProfile`] unless
    /// [`Quirks::ignore_unknown_profile`](crate::Quirks::ignore_unknown_profile)
    /// is set, in which case nothing is written.
    pub fn configure_index(&mut self, index: i32, address: Address) -> Result<(), Error<I2C::Error>> {
        self.ping(address)?;
        match Profile::try_from(index) {
            Ok(profile) => self.apply(profile, address),
            Err(index) if self.settings.quirks.ignore_unknown_profile => {
                warn!("unknown profile {}, registers left untouched", index);
                Ok(())
            }
            Err(index) => Err(Error::UnknownProfile(index)),
        }
    }

    /// Requests a reset. The device reloads its defaults, including the
    /// default address, over about 22 ms; nothing else may be sent meanwhile.
    pub fn reset(&mut self, address: Address) -> Result<(), Error<I2C::Error>> {
        debug!("reset {:#x}", address.get());
        self.write_register(register::ACQ_COMMAND, register::CMD_RESET, address)
    }

    /// [`reset`](Self::reset), then waits out the re-initialization.
    pub fn reset_and_wait(&mut self, address: Address) -> Result<(), Error<I2C::Error>> {
        let result = self.reset(address);
        self.delay.delay_ms(RESET_DELAY_MS);
        result
    }

    /// Takes a measurement and returns the distance in centimeters.
    ///
    /// Bias correction recalibrates the receiver at the cost of a slightly
    /// longer acquisition; do it about once every 100 readings.
    pub fn distance(&mut self, bias_correction: bool, address: Address) -> Result<u16, Error<I2C::Error>> {
        let triggered = self.start_measurement(bias_correction, address);
        self.tolerate(triggered, register::ACQ_COMMAND)?;
        let mut buf = [0u8; 2];
        self.read_register(register::FULL_DELAY, &mut buf, true, address)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Triggers an acquisition without waiting for it.
    pub fn start_measurement(&mut self, bias_correction: bool, address: Address) -> Result<(), Error<I2C::Error>> {
        let command = if bias_correction {
            register::CMD_MEASURE_BIAS_CORRECTED
        } else {
            register::CMD_MEASURE
        };
        self.write_register(register::ACQ_COMMAND, command, address)
    }

    /// Returns the distance once the acquisition started by
    /// [`start_measurement`](Self::start_measurement) is done.
    pub fn poll_distance(&mut self, address: Address) -> nb::Result<u16, Error<I2C::Error>> {
        if self.status(address)?.busy() {
            return Err(nb::Error::WouldBlock);
        }
        let mut buf = [0u8; 2];
        self.read_register(register::FULL_DELAY, &mut buf, false, address)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Reads the status register once.
    ///
    /// A failed read is an error in every mode.
    pub fn status(&mut self, address: Address) -> Result<Status, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        let mut nacked = None;
        let read = self.fetch(register::STATUS, &mut buf, address, &mut nacked)?;
        if let Some(err) = nacked {
            return Err(err);
        }
        read.map_err(Error::ShortRead)?;
        Ok(Status(buf[0]))
    }

    pub fn is_busy(&mut self, address: Address) -> Result<bool, Error<I2C::Error>> {
        Ok(self.status(address)?.busy())
    }

    /// Writes one register, then waits the settle time whatever the outcome.
    pub fn write_register(&mut self, register: u8, value: u8, address: Address) -> Result<(), Error<I2C::Error>> {
        trace!("write {:#x} <- {:#x}", register, value);
        let result = self
            .i2c
            .write(address.get(), &[register, value])
            .map_err(Error::from_write);
        self.delay.delay_ms(WRITE_SETTLE_MS);
        result
    }

    /// Reads `buf.len()` (1 or 2) bytes starting at `register`.
    ///
    /// With `monitor_busy_flag` the status register is polled first until the
    /// device is idle, bounded by [`Settings::busy_wait`]. `buf` is only
    /// written when the data read succeeds.
    pub fn read_register(
        &mut self,
        register: u8,
        buf: &mut [u8],
        monitor_busy_flag: bool,
        address: Address,
    ) -> Result<(), Error<I2C::Error>> {
        if buf.is_empty() || buf.len() > MAX_READ_LEN {
            return Err(Error::InvalidLength(buf.len()));
        }
        let mut nacked = None;
        if monitor_busy_flag {
            self.wait_ready(address, &mut nacked)?;
        }

        let mut scratch = [0u8; MAX_READ_LEN];
        let scratch = &mut scratch[..buf.len()];
        if self.fetch(register, scratch, address, &mut nacked)?.is_ok() {
            buf.copy_from_slice(scratch);
        }
        match nacked {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn ping(&mut self, address: Address) -> Result<(), Error<I2C::Error>> {
        self.i2c.write(address.get(), &[]).map_err(Error::from_write)
    }

    fn apply(&mut self, profile: Profile, address: Address) -> Result<(), Error<I2C::Error>> {
        for (register, value) in profile.registers() {
            let written = self.write_register(register, value, address);
            self.tolerate(written, register)?;
        }
        debug!("profile {} applied to {:#x}", profile.index(), address.get());
        Ok(())
    }

    fn tolerate(&self, result: Result<(), Error<I2C::Error>>, register: u8) -> Result<(), Error<I2C::Error>> {
        match result {
            Err(_) if self.settings.quirks.ignore_write_failures => {
                warn!("write to {:#x} failed, ignored", register);
                Ok(())
            }
            other => other,
        }
    }

    /// Sets the register pointer and reads into `buf`.
    ///
    /// The inner result is the data read. Under `read_after_nack` a pointer
    /// NACK lands in `nacked` and a failed read comes back as `Ok(Err(_))`.
    fn fetch(
        &mut self,
        register: u8,
        buf: &mut [u8],
        address: Address,
        nacked: &mut Option<Error<I2C::Error>>,
    ) -> Result<Result<(), I2C::Error>, Error<I2C::Error>> {
        let read_after_nack = self.settings.quirks.read_after_nack;
        if let Err(err) = self.i2c.write(address.get(), &[register]) {
            let err = Error::from_write(err);
            if !read_after_nack {
                return Err(err);
            }
            warn!("pointer {:#x} not acknowledged, reading anyway", register);
            nacked.get_or_insert(err);
        }
        match self.i2c.read(address.get(), buf) {
            Ok(()) => Ok(Ok(())),
            Err(err) if read_after_nack => Ok(Err(err)),
            Err(err) => Err(Error::ShortRead(err)),
        }
    }

    fn wait_ready(&mut self, address: Address, nacked: &mut Option<Error<I2C::Error>>) -> Result<(), Error<I2C::Error>> {
        let mut polls: u32 = 0;
        let mut waited_us: u32 = 0;
        loop {
            polls = polls.saturating_add(1);
            let mut buf = [0u8; 1];
            let status = match self.fetch(register::STATUS, &mut buf, address, nacked)? {
                Ok(()) => Status(buf[0]),
                // an idle bus reads as 0xff
                Err(_) => Status(0xff),
            };
            if !status.busy() {
                trace!("ready after {} polls", polls);
                return Ok(());
            }
            match self.settings.busy_wait {
                BusyWait::Polls(max) => {
                    if polls >= max {
                        break;
                    }
                }
                BusyWait::Timeout {
                    timeout_us,
                    poll_interval_us,
                } => {
                    if waited_us >= timeout_us {
                        break;
                    }
                    let step = poll_interval_us.max(1);
                    self.delay.delay_us(step);
                    waited_us = waited_us.saturating_add(step);
                }
            }
        }
        warn!("{:#x} still busy after {} polls", address.get(), polls);
        Err(Error::BusyTimeout { polls })
    }
}
