//! Outbound application events.
//!
//! The control service emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — this firmware logs them to serial.

use crate::sequencer::ActionRequest;

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The control service has started.
    Started,

    /// The policy enqueued an actuator transition this cycle.
    ActionRequested(ActionRequest),

    /// Per-cycle snapshot, emitted after the readings are committed.
    Telemetry(TelemetryData),
}

/// A point-in-time snapshot suitable for logging.
#[derive(Debug, Clone)]
pub struct TelemetryData {
    pub current_temp_c: f32,
    pub target_temp_c: f32,
    pub target_delta_c: f32,
    pub pilot_smoothed: u16,
    pub pilot_present: bool,
    pub pilot_on: bool,
    pub fire_on: bool,
    pub fan_on: bool,
    pub away_mode: bool,
    pub thermo1_raw: u16,
    pub thermo2_raw: u16,
    pub pilot_raw: u16,
}
