//! Sensor subsystem — the timed sampling pass and per-channel conditioning.
//!
//! The analog front end shares one excitation relay: the thermocouple
//! dividers and the pilot flame-rectification sensor are only powered
//! while the relay is asserted, and each channel needs a settle delay
//! before its conversion is trustworthy.

pub mod pilot;
pub mod thermo;

use std::thread;
use std::time::Duration;

use crate::app::ports::SensorPort;

/// Raw ADC counts from one sampling pass. Produced fresh every cycle and
/// not retained beyond it (only the smoothed pilot value survives, inside
/// [`pilot::PilotFilter`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorReading {
    pub thermo1: u16,
    pub thermo2: u16,
    pub pilot_raw: u16,
}

/// Drives the excitation relay and reads the three analog channels in a
/// fixed timed sequence.
pub struct Sampler {
    settle: Duration,
}

impl Sampler {
    pub fn new(settle_ms: u32) -> Self {
        Self {
            settle: Duration::from_millis(u64::from(settle_ms)),
        }
    }

    /// One full sampling pass.
    ///
    /// The four settle delays bracket every conversion and must not be
    /// elided: the divider needs them to charge and the ADC to settle.
    /// There is no error path — a saturated or floating reading is
    /// accepted as-is and left to the filter/policy to absorb.
    pub fn sample(&self, hw: &mut impl SensorPort) -> SensorReading {
        hw.set_sense_excitation(true);
        thread::sleep(self.settle);

        let thermo1 = hw.read_thermo1();
        thread::sleep(self.settle);

        let thermo2 = hw.read_thermo2();
        thread::sleep(self.settle);

        let pilot_raw = hw.read_pilot();
        thread::sleep(self.settle);

        hw.set_sense_excitation(false);

        SensorReading {
            thermo1,
            thermo2,
            pilot_raw,
        }
    }
}
