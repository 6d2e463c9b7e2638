//! Hardware adapters — bridge real peripherals to the port traits.
//!
//! Split in two because the two port halves live on different threads:
//! [`SensorAdapter`] stays with the control loop, [`RelayBank`] moves into
//! the actuator sequencer's consumer thread. These are the only types in
//! the system that touch actual hardware; on non-espidf targets the
//! underlying drivers use the `hw_init` simulation.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::hw_init;
use crate::drivers::relay::RelayDriver;
use crate::pins;

// ── Sensor side (control-loop thread) ─────────────────────────

/// ADC front end plus the sense-excitation relay.
pub struct SensorAdapter {
    sense: RelayDriver,
}

impl SensorAdapter {
    pub fn new() -> Self {
        Self {
            sense: RelayDriver::new(pins::SENSE_EN_GPIO, pins::SENSE_ACTIVE_HIGH),
        }
    }
}

impl Default for SensorAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for SensorAdapter {
    fn set_sense_excitation(&mut self, on: bool) {
        let _ = self.sense.set(on);
    }

    fn read_thermo1(&mut self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_THERMO1)
    }

    fn read_thermo2(&mut self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_THERMO2)
    }

    fn read_pilot(&mut self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_PILOT)
    }
}

// ── Actuator side (sequencer thread) ──────────────────────────

/// The three interlocked output relays.
///
/// Construction drives every relay to its de-energised level, so the
/// plant always boots cold regardless of what the lines floated at.
pub struct RelayBank {
    pilot: RelayDriver,
    fire: RelayDriver,
    fan: RelayDriver,
}

impl RelayBank {
    pub fn new() -> Self {
        Self {
            pilot: RelayDriver::new(pins::PILOT_EN_GPIO, pins::PILOT_ACTIVE_HIGH),
            fire: RelayDriver::new(pins::FIRE_EN_GPIO, pins::FIRE_ACTIVE_HIGH),
            fan: RelayDriver::new(pins::FAN_EN_GPIO, pins::FAN_ACTIVE_HIGH),
        }
    }
}

impl Default for RelayBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for RelayBank {
    fn set_pilot(&mut self, on: bool) -> bool {
        self.pilot.set(on)
    }

    fn set_fire(&mut self, on: bool) -> bool {
        self.fire.set(on)
    }

    fn set_fan(&mut self, on: bool) -> bool {
        self.fan.set(on)
    }
}

#[cfg(test)]
#[cfg(not(target_os = "espidf"))]
mod tests {
    use super::*;

    #[test]
    fn relay_bank_boots_all_off() {
        let _bank = RelayBank::new();
        // De-energised levels per polarity: pilot/fire idle high, fan low.
        assert_eq!(hw_init::sim_gpio_level(pins::PILOT_EN_GPIO), Some(true));
        assert_eq!(hw_init::sim_gpio_level(pins::FIRE_EN_GPIO), Some(true));
        assert_eq!(hw_init::sim_gpio_level(pins::FAN_EN_GPIO), Some(false));
    }

    #[test]
    fn sensor_adapter_reads_injected_conversions() {
        hw_init::sim_set_adc(hw_init::ADC1_CH_THERMO1, 2100);
        hw_init::sim_set_adc(hw_init::ADC1_CH_THERMO2, 2300);
        hw_init::sim_set_adc(hw_init::ADC1_CH_PILOT, 950);

        let mut hw = SensorAdapter::new();
        assert_eq!(hw.read_thermo1(), 2100);
        assert_eq!(hw.read_thermo2(), 2300);
        assert_eq!(hw.read_pilot(), 950);
    }

    #[test]
    fn excitation_relay_is_active_high() {
        let mut hw = SensorAdapter::new();
        hw.set_sense_excitation(true);
        assert_eq!(hw_init::sim_gpio_level(pins::SENSE_EN_GPIO), Some(true));
        hw.set_sense_excitation(false);
        assert_eq!(hw_init::sim_gpio_level(pins::SENSE_EN_GPIO), Some(false));
    }
}
