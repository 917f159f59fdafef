//! Boolean / sentinel call signatures of the Arduino LIDARLite library.
//!
//! Useful when porting sketches. Every failure collapses to `false` or
//! [`FAILURE`]; use [`LidarLite`] directly to tell them apart.

use embedded_hal_1::{delay::DelayNs, i2c::I2c};

use crate::config::{I2C_FAST_HZ, I2C_STANDARD_HZ, Settings};
use crate::register::Address;
use crate::LidarLite;

/// Returned by [`Classic::measure_distance`] when no distance could be read.
pub const FAILURE: i32 = -1;

/// [`LidarLite`] with [`Settings::classic`] and the Arduino library return types.
///
/// Which bus "channel" is used is decided by the bus handed to [`Classic::new`].
pub struct Classic<I2C, D> {
    inner: LidarLite<I2C, D>,
}

impl<I2C, D> Classic<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        Classic {
            inner: LidarLite::with_settings(i2c, delay, Settings::classic()),
        }
    }

    /// Applies `profile`. The bus must already run at 400 kHz when
    /// `fast_i2c` is set, 100 kHz otherwise.
    pub fn initialize(&mut self, profile: i32, fast_i2c: bool, address: u8) -> bool {
        let hz = if fast_i2c { I2C_FAST_HZ } else { I2C_STANDARD_HZ };
        debug!("initialize {:#x}: profile {}, bus at {} Hz", address, profile, hz);
        self.configure(profile, address)
    }

    /// `false` only when the device does not answer its address. Unknown
    /// profiles and failed register writes still return `true`.
    pub fn configure(&mut self, profile: i32, address: u8) -> bool {
        let Some(address) = Address::new(address) else {
            return false;
        };
        self.inner.configure_index(profile, address).is_ok()
    }

    /// Takes about 22 ms to complete; do not talk to the device meanwhile.
    pub fn reset(&mut self, address: u8) {
        if let Some(address) = Address::new(address) {
            let _ = self.inner.reset(address);
        }
    }

    /// Distance in centimeters, or [`FAILURE`].
    pub fn measure_distance(&mut self, bias_correction: bool, address: u8) -> i32 {
        let Some(address) = Address::new(address) else {
            return FAILURE;
        };
        match self.inner.distance(bias_correction, address) {
            Ok(cm) => i32::from(cm),
            Err(_) => FAILURE,
        }
    }

    pub fn write_register(&mut self, register: u8, value: u8, address: u8) -> bool {
        let Some(address) = Address::new(address) else {
            return false;
        };
        self.inner.write_register(register, value, address).is_ok()
    }

    /// Reads `byte_count` (1 or 2) bytes into the front of `out`.
    ///
    /// The result only reflects the busy-wait and the register pointer
    /// write: if the data read itself fails, `out` keeps its previous
    /// contents and `true` may still be returned.
    pub fn read_register(
        &mut self,
        register: u8,
        byte_count: usize,
        out: &mut [u8],
        monitor_busy_flag: bool,
        address: u8,
    ) -> bool {
        let Some(address) = Address::new(address) else {
            return false;
        };
        let Some(buf) = out.get_mut(..byte_count) else {
            return false;
        };
        self.inner
            .read_register(register, buf, monitor_busy_flag, address)
            .is_ok()
    }

    pub fn into_inner(self) -> LidarLite<I2C, D> {
        self.inner
    }

    pub fn release(self) -> (I2C, D) {
        self.inner.release()
    }
}
