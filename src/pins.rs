//! GPIO / peripheral pin assignments for the AquaFlame controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//!
//! Plain ESP32 (not S3): ADC1 lives on GPIO 32–39.

// ---------------------------------------------------------------------------
// Relay outputs
// ---------------------------------------------------------------------------

/// Pilot-sense relay coil. Active LOW — driving the pin low energises the
/// relay and enables the pilot valve.
pub const PILOT_EN_GPIO: i32 = 13;
/// Main burner ("fire") relay coil. Active LOW.
pub const FIRE_EN_GPIO: i32 = 12;
/// Thermocouple sense-excitation relay. Active HIGH; asserted only for the
/// ~40 ms sampling window each cycle.
pub const SENSE_EN_GPIO: i32 = 14;
/// Exhaust/forced-air fan relay. Active HIGH.
pub const FAN_EN_GPIO: i32 = 4;

/// Relay polarities (true = energised when the GPIO is driven high).
pub const PILOT_ACTIVE_HIGH: bool = false;
pub const FIRE_ACTIVE_HIGH: bool = false;
pub const SENSE_ACTIVE_HIGH: bool = true;
pub const FAN_ACTIVE_HIGH: bool = true;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Tank thermocouple 1, read through the sense-excitation divider.
pub const THERMO1_ADC_GPIO: i32 = 32;
/// Tank thermocouple 2.
pub const THERMO2_ADC_GPIO: i32 = 35;
/// Pilot flame-rectification sensor.
pub const PILOT_ADC_GPIO: i32 = 33;
/// Fan current-sense input. Populated on the board but not read by this
/// firmware revision (no fan feedback loop).
pub const FAN_ADC_GPIO: i32 = 34;

// ---------------------------------------------------------------------------
// External bridge peripherals
// ---------------------------------------------------------------------------
//
// Consumed by the display and rotary-encoder bridges, which talk to the
// core only through `CoreState` accessors. Listed here so the board map
// stays in one place.

/// I²C bus for the 16x2 character display (PCF8574 backpack).
pub const DISPLAY_I2C_SCL_GPIO: i32 = 22;
pub const DISPLAY_I2C_SDA_GPIO: i32 = 21;
pub const DISPLAY_I2C_ADDR: u8 = 0x27;

/// Rotary encoder (target-temperature knob).
pub const ROTARY_CLK_GPIO: i32 = 27;
pub const ROTARY_DT_GPIO: i32 = 26;
pub const ROTARY_BTN_GPIO: i32 = 25;
