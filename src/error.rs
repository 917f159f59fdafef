use core::fmt::Debug;

use embedded_hal_1::i2c::ErrorKind;

/// LIDAR-Lite errors
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E>
where
    E: Debug,
{
    /// The device did not acknowledge its address or a written byte
    #[error("device did not acknowledge: {0:?}")]
    DeviceAbsent(E),
    /// Any other I²C bus error
    #[error("I2C error: {0:?}")]
    I2c(E),
    /// The busy flag was still set when the busy-wait gave up
    #[error("device still busy after {polls} status polls")]
    BusyTimeout { polls: u32 },
    /// The data read after setting the register pointer failed
    #[error("register read failed: {0:?}")]
    ShortRead(E),
    /// Profile number outside 0..=5
    #[error("unknown configuration profile {0}")]
    UnknownProfile(i32),
    /// Address is not an even 7-bit value
    #[error("invalid device address {0:#x}")]
    InvalidAddress(u8),
    /// Register reads are 1 or 2 bytes long
    #[error("invalid read length {0}")]
    InvalidLength(usize),
}

impl<E> Error<E>
where
    E: embedded_hal_1::i2c::Error,
{
    /// Classifies an error returned by a bus write.
    pub(crate) fn from_write(err: E) -> Self {
        match err.kind() {
            ErrorKind::NoAcknowledge(_) => Error::DeviceAbsent(err),
            _ => Error::I2c(err),
        }
    }
}

impl<E: Debug> Error<E> {
    /// True for errors meaning nothing answered at the address.
    pub fn is_device_absent(&self) -> bool {
        matches!(self, Error::DeviceAbsent(_))
    }

    /// True when the busy-wait gave up.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::BusyTimeout { .. })
    }
}
