//! Platform-agnostic driver for the Garmin LIDAR-Lite v3 laser rangefinder.
//!
//! ```rust,no_run
//! use lidar_lite_v3::{Address, Config, LidarLite};
//!
//! let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! let delay = embedded_hal_mock::eh1::delay::NoopDelay;
//! let mut lidar = LidarLite::new(i2c, delay);
//!
//! lidar.init(&Config::default()).unwrap();
//! let cm = lidar.distance(true, Address::DEFAULT).unwrap();
//! println!("{} cm", cm);
//! ```
//!
//! Logging goes to `log` or `defmt` when the feature of the same name is on.

#![cfg_attr(not(test), no_std)]

mod fmt; // <-- must be first module!

pub mod classic;
pub mod compat;
mod config;
mod driver;
mod error;
pub mod register;
#[cfg(test)]
mod sim;

pub use crate::config::{BiasSchedule, BusyWait, Config, Quirks, Settings, I2C_FAST_HZ, I2C_STANDARD_HZ};
pub use crate::driver::{LidarLite, RESET_DELAY_MS};
pub use crate::error::Error;
pub use crate::register::{Address, Profile, Status};
