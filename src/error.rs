//! Unified error types for the AquaFlame firmware.
//!
//! Follows embedded practice: a single `Error` enum that every fallible
//! subsystem converts into, keeping top-level handling uniform. All
//! variants are `Copy` so they can be passed around without allocation.
//!
//! Deliberately small. Sensor reads have no error path (a saturated or
//! out-of-range ADC count is accepted as-is), and actuator pin writes are
//! fire-and-forget — neither can produce an `Error` in this design.

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
