//! System configuration parameters.
//!
//! All tunable parameters for the heater controller. Built once in `main`
//! (or a test) and handed to the control service by value — there is no
//! process-wide mutable configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Thermostat ---
    /// Initial target water temperature (Celsius).
    pub target_temp_c: f32,
    /// Hysteresis half-width: the dead zone is `target ± delta`.
    pub target_delta_c: f32,

    // --- Pilot sensing ---
    /// Smoothed pilot ADC count above which the pilot flame is considered
    /// lit.
    pub pilot_on_threshold: u16,

    // --- Thermocouple calibration (ADC count -> Celsius, linear) ---
    /// Slope of the calibration line. Negative: the divider voltage falls
    /// as the water warms.
    pub thermo_mult: f32,
    /// Intercept of the calibration line.
    pub thermo_offset: f32,

    // --- Timing ---
    /// Control loop period (milliseconds).
    pub control_loop_interval_ms: u32,
    /// Settle/conversion delay between the steps of one sampling pass
    /// (milliseconds).
    pub adc_settle_ms: u32,
    /// Mandatory hold during actuator transitions: fan pre-run before the
    /// burner lights, and purge after it stops (milliseconds).
    pub actuator_hold_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Thermostat
            target_temp_c: 50.0,
            target_delta_c: 5.0,

            // Pilot
            pilot_on_threshold: 200,

            // Calibration (matches the installed divider network)
            thermo_mult: -0.028675,
            thermo_offset: 115.63,

            // Timing
            control_loop_interval_ms: 1000, // 1 Hz
            adc_settle_ms: 10,
            actuator_hold_ms: 3000,
        }
    }
}

impl SystemConfig {
    /// Reject configurations the controller cannot safely run with.
    pub fn validate(&self) -> Result<()> {
        if !self.target_temp_c.is_finite() || !self.target_delta_c.is_finite() {
            return Err(Error::Config("thermostat setpoint must be finite"));
        }
        if self.target_delta_c <= 0.0 {
            return Err(Error::Config("hysteresis delta must be positive"));
        }
        if self.pilot_on_threshold == 0 {
            return Err(Error::Config("pilot threshold must be non-zero"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(Error::Config("control loop interval must be non-zero"));
        }
        if self.thermo_mult == 0.0 {
            return Err(Error::Config("thermo calibration slope must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.validate().is_ok());
        assert!(c.target_delta_c > 0.0);
        assert!(c.pilot_on_threshold > 0);
        assert!(c.control_loop_interval_ms > 0);
        assert!(c.actuator_hold_ms > 0);
        // The hold must dominate the filter time constant so the pilot
        // debounce and the purge timing stay matched.
        assert!(c.actuator_hold_ms >= 3 * c.control_loop_interval_ms);
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert!((c.target_temp_c - c2.target_temp_c).abs() < 0.001);
        assert!((c.thermo_mult - c2.thermo_mult).abs() < 1e-9);
        assert_eq!(c.pilot_on_threshold, c2.pilot_on_threshold);
        assert_eq!(c.actuator_hold_ms, c2.actuator_hold_ms);
    }

    #[test]
    fn zero_delta_rejected() {
        let c = SystemConfig {
            target_delta_c: 0.0,
            ..SystemConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(Error::Config("hysteresis delta must be positive"))
        );
    }

    #[test]
    fn zero_interval_rejected() {
        let c = SystemConfig {
            control_loop_interval_ms: 0,
            ..SystemConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn nan_setpoint_rejected() {
        let c = SystemConfig {
            target_temp_c: f32::NAN,
            ..SystemConfig::default()
        };
        assert!(c.validate().is_err());
    }
}
