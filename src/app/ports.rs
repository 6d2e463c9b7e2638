//! Port traits — the boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ domain (sampler / sequencer / service)
//! ```
//!
//! Driven adapters (the ADC front end, the relay bank, event sinks)
//! implement these traits. The domain consumes them via generics, so the
//! core never touches hardware directly.

use crate::app::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the sampler calls this to run one sampling pass.
///
/// The sampler owns the sequencing and settle timing; implementations
/// just touch the excitation relay and perform single conversions.
pub trait SensorPort {
    /// Assert or release the sense-excitation relay.
    fn set_sense_excitation(&mut self, on: bool);

    /// One conversion of thermocouple channel 1.
    fn read_thermo1(&mut self) -> u16;

    /// One conversion of thermocouple channel 2.
    fn read_thermo2(&mut self) -> u16;

    /// One conversion of the pilot flame sensor.
    fn read_pilot(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the actuator sequencer calls this to command relays.
///
/// Every setter returns the *previous* commanded state — the sequencer's
/// transition guards and the shutdown diagnostic consume it. Writes are
/// fire-and-forget; a stuck relay is not observable at this level.
///
/// `Send` because the implementation moves into the sequencer's consumer
/// thread.
pub trait ActuatorPort: Send {
    /// Command the pilot relay. Returns the previous commanded state.
    fn set_pilot(&mut self, on: bool) -> bool;

    /// Command the burner ("fire") relay. Returns the previous state.
    fn set_fire(&mut self, on: bool) -> bool;

    /// Command the fan relay. Returns the previous state.
    fn set_fan(&mut self, on: bool) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port. Adapters
/// decide where they go (serial log in this firmware; the MQTT bridge
/// observes the core through `CoreState` instead).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
