use crate::register::{Address, Profile};

/// Standard-mode I²C clock.
pub const I2C_STANDARD_HZ: u32 = 100_000;
/// Fast-mode I²C clock.
pub const I2C_FAST_HZ: u32 = 400_000;

/// How long to wait on the busy flag before giving up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusyWait {
    /// Read the status register at most this many times, back to back.
    Polls(u32),
    /// Sleep `poll_interval_us` between status reads and stop once the
    /// accumulated sleep reaches `timeout_us`. Bus time is not counted, so
    /// the real wait is a bit longer than `timeout_us`.
    Timeout { timeout_us: u32, poll_interval_us: u32 },
}

impl BusyWait {
    /// Status poll bound of the Arduino library.
    pub const CLASSIC: BusyWait = BusyWait::Polls(10_000);
}

impl Default for BusyWait {
    fn default() -> Self {
        BusyWait::Timeout {
            timeout_us: 1_000_000,
            poll_interval_us: 100,
        }
    }
}

/// Behaviors kept only for parity with the Arduino library.
///
/// All off by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Quirks {
    /// An unknown profile number writes nothing and reports success.
    pub ignore_unknown_profile: bool,
    /// Failed register writes are logged and skipped: `configure` succeeds
    /// once the device answers its address, and `distance` reads on even if the
    /// trigger write failed.
    pub ignore_write_failures: bool,
    /// A NACK on the register pointer is remembered but the read still runs.
    /// A failed read leaves the buffer untouched without failing the call, and
    /// a failed status read counts as busy while busy-waiting.
    pub read_after_nack: bool,
}

impl Quirks {
    pub const NONE: Quirks = Quirks {
        ignore_unknown_profile: false,
        ignore_write_failures: false,
        read_after_nack: false,
    };

    pub const CLASSIC: Quirks = Quirks {
        ignore_unknown_profile: true,
        ignore_write_failures: true,
        read_after_nack: true,
    };
}

/// Driver behavior settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub busy_wait: BusyWait,
    pub quirks: Quirks,
}

impl Settings {
    /// Same observable behavior as the Arduino library.
    pub const fn classic() -> Self {
        Settings {
            busy_wait: BusyWait::CLASSIC,
            quirks: Quirks::CLASSIC,
        }
    }
}

/// Parameters for [`LidarLite::init`](crate::LidarLite::init).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub profile: Profile,
    /// 400 kHz instead of 100 kHz. The bus is clocked by whoever builds it,
    /// see [`Config::bus_frequency_hz`].
    pub fast_i2c: bool,
    pub address: Address,
}

impl Config {
    pub fn bus_frequency_hz(&self) -> u32 {
        if self.fast_i2c {
            I2C_FAST_HZ
        } else {
            I2C_STANDARD_HZ
        }
    }
}

/// Decides which measurements get receiver bias correction.
///
/// The device should be bias-corrected periodically, e.g. once every 100
/// readings, with the faster uncorrected acquisition the rest of the time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiasSchedule {
    period: u16,
    count: u16,
}

impl BiasSchedule {
    /// `period` of 0 is treated as 1, i.e. correct every reading.
    pub fn new(period: u16) -> Self {
        BiasSchedule {
            period: period.max(1),
            count: 0,
        }
    }

    /// Whether the next measurement should use bias correction. The first
    /// call always returns `true`.
    pub fn tick(&mut self) -> bool {
        let correct = self.count == 0;
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
        }
        correct
    }
}

impl Default for BiasSchedule {
    fn default() -> Self {
        BiasSchedule::new(100)
    }
}
