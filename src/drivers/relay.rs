//! Latching relay output driver.
//!
//! The controller board mixes relay polarities: the pilot and burner
//! relays energise on a LOW coil line, the fan and sense-excitation
//! relays on HIGH. This driver hides the polarity behind a logical
//! on/off and tracks the commanded state, handing the previous state
//! back from `set()` for the sequencer's transition guards.
//!
//! Writes are fire-and-forget; a stuck contact is not observable here.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via `hw_init`.
//! On host/test: writes land in the `hw_init` simulation level table.

use crate::drivers::hw_init;

pub struct RelayDriver {
    gpio: i32,
    active_high: bool,
    commanded: bool,
}

impl RelayDriver {
    /// Construct the driver and drive the line to its de-energised level.
    pub fn new(gpio: i32, active_high: bool) -> Self {
        let mut relay = Self {
            gpio,
            active_high,
            commanded: true, // force the initial write through
        };
        let _ = relay.set(false);
        relay
    }

    /// Command the relay. Returns the previous commanded state.
    pub fn set(&mut self, on: bool) -> bool {
        let prev = self.commanded;
        self.commanded = on;
        hw_init::gpio_write(self.gpio, on == self.active_high);
        prev
    }

    /// Last commanded state.
    pub fn is_on(&self) -> bool {
        self.commanded
    }
}

#[cfg(test)]
#[cfg(not(target_os = "espidf"))]
mod tests {
    use super::*;

    #[test]
    fn construction_drives_the_off_level() {
        let active_low = RelayDriver::new(36, false);
        assert!(!active_low.is_on());
        assert_eq!(hw_init::sim_gpio_level(36), Some(true), "active-low off = high");

        let active_high = RelayDriver::new(37, true);
        assert!(!active_high.is_on());
        assert_eq!(hw_init::sim_gpio_level(37), Some(false));
    }

    #[test]
    fn set_respects_polarity_and_returns_previous() {
        let mut relay = RelayDriver::new(38, false);

        assert!(!relay.set(true), "was off");
        assert!(relay.is_on());
        assert_eq!(hw_init::sim_gpio_level(38), Some(false), "active-low on = low");

        assert!(relay.set(true), "repeat returns previous = on");
        assert!(relay.set(false));
        assert!(!relay.set(false));
        assert_eq!(hw_init::sim_gpio_level(38), Some(true));
    }

    #[test]
    fn active_high_levels() {
        let mut relay = RelayDriver::new(39, true);
        let _ = relay.set(true);
        assert_eq!(hw_init::sim_gpio_level(39), Some(true));
        let _ = relay.set(false);
        assert_eq!(hw_init::sim_gpio_level(39), Some(false));
    }
}
