//! Shared core state — the coupling point for external bridges.
//!
//! One `Arc<CoreState>` is cloned into the control loop, the actuator
//! sequencer, and every external component (MQTT bridge, display, rotary
//! encoder). All fields are lock-free atomics with single-writer-per-field
//! discipline and last-writer-wins semantics:
//!
//! - actuator flags: written only by the sequencer thread;
//! - readings and derived temperature: written only by the control loop;
//! - settings: written by external components at arbitrary times, read by
//!   the policy once per cycle.
//!
//! `f32` fields are stored as their bit patterns in `AtomicU32`.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, AtomicU32, Ordering};
use std::sync::Arc;

use crate::config::SystemConfig;
use crate::sensors::SensorReading;

// ───────────────────────────────────────────────────────────────
// Actuator flags
// ───────────────────────────────────────────────────────────────

/// Commanded state of the three output relays.
///
/// Mutated exclusively by the actuator sequencer (the setters are
/// crate-private); everyone else reads.
#[derive(Debug, Default)]
pub struct ActuatorFlags {
    pilot: AtomicBool,
    fire: AtomicBool,
    fan: AtomicBool,
}

/// Point-in-time copy of the actuator flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorSnapshot {
    pub pilot: bool,
    pub fire: bool,
    pub fan: bool,
}

impl ActuatorFlags {
    pub fn pilot(&self) -> bool {
        self.pilot.load(Ordering::Acquire)
    }

    pub fn fire(&self) -> bool {
        self.fire.load(Ordering::Acquire)
    }

    pub fn fan(&self) -> bool {
        self.fan.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> ActuatorSnapshot {
        ActuatorSnapshot {
            pilot: self.pilot(),
            fire: self.fire(),
            fan: self.fan(),
        }
    }

    pub(crate) fn set_pilot(&self, on: bool) {
        self.pilot.store(on, Ordering::Release);
    }

    pub(crate) fn set_fire(&self, on: bool) {
        self.fire.store(on, Ordering::Release);
    }

    pub(crate) fn set_fan(&self, on: bool) {
        self.fan.store(on, Ordering::Release);
    }
}

// ───────────────────────────────────────────────────────────────
// Pending manual operation
// ───────────────────────────────────────────────────────────────

/// One-shot manual override, set over the reporting bridge and consumed by
/// the policy exactly once.
///
/// The set-operation mutator accepts any string; anything other than
/// `"Heating"` / `"Idle"` parks as `Unrecognized`, which the policy
/// discards with a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PendingOperation {
    None = 0,
    Heating = 1,
    Idle = 2,
    Unrecognized = 3,
}

impl PendingOperation {
    pub fn parse(s: &str) -> Self {
        match s {
            "Heating" => Self::Heating,
            "Idle" => Self::Idle,
            _ => Self::Unrecognized,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Heating,
            2 => Self::Idle,
            3 => Self::Unrecognized,
            _ => Self::None,
        }
    }
}

/// Thermostat settings as the policy sees them for one cycle.
#[derive(Debug, Clone, Copy)]
pub struct SettingsSnapshot {
    pub target_temp_c: f32,
    pub target_delta_c: f32,
    pub away_mode: bool,
    pub pending: PendingOperation,
}

// ───────────────────────────────────────────────────────────────
// CoreState
// ───────────────────────────────────────────────────────────────

/// Shared controller state: thermostat settings, the latest readings, and
/// the actuator flags.
#[derive(Debug)]
pub struct CoreState {
    // Settings (written by external bridges)
    target_temp_bits: AtomicU32,
    target_delta_bits: AtomicU32,
    away_mode: AtomicBool,
    pending_op: AtomicU8,
    report_adc: AtomicBool,

    // Latest cycle (written by the control loop)
    current_temp_bits: AtomicU32,
    thermo1_raw: AtomicU16,
    thermo2_raw: AtomicU16,
    pilot_raw: AtomicU16,

    actuators: Arc<ActuatorFlags>,
}

impl CoreState {
    pub fn new(config: &SystemConfig) -> Arc<Self> {
        Arc::new(Self {
            target_temp_bits: AtomicU32::new(config.target_temp_c.to_bits()),
            target_delta_bits: AtomicU32::new(config.target_delta_c.to_bits()),
            away_mode: AtomicBool::new(false),
            pending_op: AtomicU8::new(PendingOperation::None as u8),
            report_adc: AtomicBool::new(false),
            current_temp_bits: AtomicU32::new(0.0f32.to_bits()),
            thermo1_raw: AtomicU16::new(0),
            thermo2_raw: AtomicU16::new(0),
            pilot_raw: AtomicU16::new(0),
            actuators: Arc::new(ActuatorFlags::default()),
        })
    }

    // ── Read accessors (external bridges + policy) ────────────

    pub fn current_temp(&self) -> f32 {
        f32::from_bits(self.current_temp_bits.load(Ordering::Acquire))
    }

    pub fn target_temp(&self) -> f32 {
        f32::from_bits(self.target_temp_bits.load(Ordering::Acquire))
    }

    pub fn target_delta(&self) -> f32 {
        f32::from_bits(self.target_delta_bits.load(Ordering::Acquire))
    }

    pub fn away_mode(&self) -> bool {
        self.away_mode.load(Ordering::Acquire)
    }

    pub fn report_adc(&self) -> bool {
        self.report_adc.load(Ordering::Acquire)
    }

    /// Raw per-channel ADC counts of the last completed cycle:
    /// `(thermo1, thermo2, pilot)`.
    pub fn last_reading(&self) -> (u16, u16, u16) {
        (
            self.thermo1_raw.load(Ordering::Acquire),
            self.thermo2_raw.load(Ordering::Acquire),
            self.pilot_raw.load(Ordering::Acquire),
        )
    }

    pub fn actuators(&self) -> &ActuatorFlags {
        &self.actuators
    }

    /// Shared handle to the actuator flags, for the sequencer (the only
    /// writer).
    pub fn actuators_shared(&self) -> Arc<ActuatorFlags> {
        Arc::clone(&self.actuators)
    }

    pub fn pilot_on(&self) -> bool {
        self.actuators.pilot()
    }

    pub fn fire_on(&self) -> bool {
        self.actuators.fire()
    }

    pub fn fan_on(&self) -> bool {
        self.actuators.fan()
    }

    // ── Mutators (external bridges) ───────────────────────────

    /// Set the target temperature, rounded to one decimal place.
    pub fn set_target_temp(&self, temp_c: f32) {
        let rounded = (temp_c * 10.0).round() / 10.0;
        self.target_temp_bits
            .store(rounded.to_bits(), Ordering::Release);
    }

    pub fn set_away_mode(&self, away: bool) {
        self.away_mode.store(away, Ordering::Release);
    }

    /// Request a one-shot manual operation. Any string is accepted;
    /// unrecognized values are discarded by the policy with a diagnostic.
    pub fn set_operation(&self, op: &str) {
        self.pending_op
            .store(PendingOperation::parse(op) as u8, Ordering::Release);
    }

    pub fn set_report_adc(&self, on: bool) {
        self.report_adc.store(on, Ordering::Release);
    }

    // ── Control-loop internals ────────────────────────────────

    pub(crate) fn settings_snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            target_temp_c: self.target_temp(),
            target_delta_c: self.target_delta(),
            away_mode: self.away_mode(),
            pending: PendingOperation::from_u8(self.pending_op.load(Ordering::Acquire)),
        }
    }

    pub(crate) fn clear_pending_operation(&self) {
        self.pending_op
            .store(PendingOperation::None as u8, Ordering::Release);
    }

    pub(crate) fn record_sample(&self, reading: &SensorReading, temp_c: f32) {
        self.thermo1_raw.store(reading.thermo1, Ordering::Release);
        self.thermo2_raw.store(reading.thermo2, Ordering::Release);
        self.pilot_raw.store(reading.pilot_raw, Ordering::Release);
        self.current_temp_bits
            .store(temp_c.to_bits(), Ordering::Release);
    }
}
