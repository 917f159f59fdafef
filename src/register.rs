//! Register map and preset tables.

use core::fmt::Debug;

use crate::Error;

/// Acquisition command register, also takes the reset command.
pub const ACQ_COMMAND: u8 = 0x00;
/// Status register; bit 0 is the busy flag.
pub const STATUS: u8 = 0x01;
/// Maximum acquisition count.
pub const SIG_COUNT_VAL: u8 = 0x02;
/// Acquisition mode control, includes quick termination.
pub const ACQ_CONFIG_REG: u8 = 0x04;
/// Peak detection threshold bypass.
pub const THRESHOLD_BYPASS: u8 = 0x1c;
/// Distance result, high byte first; bit 7 turns on auto-increment.
pub const FULL_DELAY: u8 = 0x8f;

/// Take acquisition without receiver bias correction.
pub const CMD_MEASURE: u8 = 0x03;
/// Take acquisition with receiver bias correction.
pub const CMD_MEASURE_BIAS_CORRECTED: u8 = 0x04;
/// Reload defaults, takes about 22 ms.
pub const CMD_RESET: u8 = 0x00;

const STATUS_BUSY: u8 = 0b0000_0001;

/// 7-bit I²C address of a LIDAR-Lite.
///
/// The device only accepts even addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    /// Factory default address
    pub const DEFAULT: Address = Address(0x62);

    /// Returns `None` unless `address` is an even value below 0x80.
    pub const fn new(address: u8) -> Option<Self> {
        if address >= 0x80 || address & 1 != 0 {
            return None;
        }
        Some(Address(address))
    }

    /// Like [`Address::new`], failing with [`Error::InvalidAddress`].
    pub fn checked<E: Debug>(address: u8) -> Result<Self, Error<E>> {
        Address::new(address).ok_or(Error::InvalidAddress(address))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::DEFAULT
    }
}

/// Preset configurations trading range, speed and sensitivity.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Profile {
    /// Balanced performance
    Default = 0,
    /// Short range, high speed. 0x1d maximum acquisition count.
    ShortRangeFast,
    /// Default range, faster at short range thanks to quick termination,
    /// with decreased accuracy
    DefaultRangeFast,
    /// Maximum range, 0xff maximum acquisition count
    MaximumRange,
    /// High sensitivity detection, more erroneous measurements
    HighSensitivity,
    /// Low sensitivity detection, fewer erroneous measurements
    LowSensitivity,
}

impl Profile {
    pub const ALL: [Profile; 6] = [
        Profile::Default,
        Profile::ShortRangeFast,
        Profile::DefaultRangeFast,
        Profile::MaximumRange,
        Profile::HighSensitivity,
        Profile::LowSensitivity,
    ];

    /// Register writes for this profile, in the order they are issued.
    pub fn registers(self) -> [(u8, u8); 3] {
        let (count, mode, threshold) = match self {
            Profile::Default => (0x80, 0x08, 0x00),
            Profile::ShortRangeFast => (0x1d, 0x08, 0x00),
            Profile::DefaultRangeFast => (0x80, 0x00, 0x00),
            Profile::MaximumRange => (0xff, 0x08, 0x00),
            Profile::HighSensitivity => (0x80, 0x08, 0x80),
            Profile::LowSensitivity => (0x80, 0x08, 0xb0),
        };
        [
            (SIG_COUNT_VAL, count),
            (ACQ_CONFIG_REG, mode),
            (THRESHOLD_BYPASS, threshold),
        ]
    }

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile::Default
    }
}

impl TryFrom<i32> for Profile {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Profile::ALL.get(i).copied())
            .ok_or(value)
    }
}

impl TryFrom<u8> for Profile {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Profile::ALL.get(value as usize).copied().ok_or(value)
    }
}

/// Contents of the status register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(pub u8);

impl Status {
    /// An acquisition is in progress.
    pub fn busy(self) -> bool {
        self.0 & STATUS_BUSY != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_1::i2c::ErrorKind;

    #[test]
    fn profile_table() {
        let expected = [
            (0x80, 0x08, 0x00),
            (0x1d, 0x08, 0x00),
            (0x80, 0x00, 0x00),
            (0xff, 0x08, 0x00),
            (0x80, 0x08, 0x80),
            (0x80, 0x08, 0xb0),
        ];
        for (profile, (count, mode, threshold)) in Profile::ALL.iter().zip(expected) {
            assert_eq!(
                profile.registers(),
                [(0x02, count), (0x04, mode), (0x1c, threshold)],
                "{:?}",
                profile
            );
        }
    }

    #[test]
    fn profile_from_index() {
        assert_eq!(Profile::try_from(0i32), Ok(Profile::Default));
        assert_eq!(Profile::try_from(5i32), Ok(Profile::LowSensitivity));
        assert_eq!(Profile::try_from(6i32), Err(6));
        assert_eq!(Profile::try_from(-1i32), Err(-1));
        assert_eq!(Profile::try_from(3u8), Ok(Profile::MaximumRange));
        assert_eq!(Profile::try_from(200u8), Err(200));
        for profile in Profile::ALL {
            assert_eq!(Profile::try_from(profile.index()), Ok(profile));
        }
    }

    #[test]
    fn address_must_be_even_7bit() {
        assert_eq!(Address::new(0x62), Some(Address::DEFAULT));
        assert_eq!(Address::new(0x66).map(Address::get), Some(0x66));
        assert_eq!(Address::new(0x63), None);
        assert_eq!(Address::new(0x80), None);
    }

    #[test]
    fn checked_address_reports_the_value() {
        let address = Address::checked::<ErrorKind>(0x64).unwrap();
        assert_eq!(address.get(), 0x64);
        assert!(matches!(
            Address::checked::<ErrorKind>(0x63),
            Err(Error::InvalidAddress(0x63))
        ));
        assert!(matches!(
            Address::checked::<ErrorKind>(0xc4),
            Err(Error::InvalidAddress(0xc4))
        ));
    }

    #[test]
    fn busy_flag_is_bit_zero() {
        assert!(Status(0x01).busy());
        assert!(Status(0xff).busy());
        assert!(!Status(0x00).busy());
        assert!(!Status(0xfe).busy());
    }
}
