//! AquaFlame firmware — main entry point.
//!
//! Composition root for the device build: initialise peripherals, wire
//! adapters to the port traits, spawn the actuator sequencer on the
//! application core, and hand the main task to the control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │   SensorAdapter      RelayBank        LogEventSink       │
//! │   (SensorPort)       (ActuatorPort)   (EventSink)        │
//! │                                                          │
//! │  ───────────────── Port trait boundary ───────────────   │
//! │                                                          │
//! │  ControlService ──ActionRequest──▶ Sequencer thread      │
//! │  (main task, 1 Hz)                 (ActuatorBank)        │
//! │                                                          │
//! │  CoreState (Arc) ◀── MQTT / display / rotary bridges     │
//! └──────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use log::{debug, info};

use aquaflame::adapters::hardware::{RelayBank, SensorAdapter};
use aquaflame::adapters::log_sink::LogEventSink;
use aquaflame::app::service::ControlService;
use aquaflame::app::state::CoreState;
use aquaflame::config::SystemConfig;
use aquaflame::drivers::hw_init;
use aquaflame::sequencer::{ActuatorBank, Sequencer};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("AquaFlame v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt. The task
        // watchdog will reset the device after its timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Core state + actuator sequencer ────────────────────
    let config = SystemConfig::default();
    let state = CoreState::new(&config);

    let bank = ActuatorBank::new(
        RelayBank::new(),
        state.actuators_shared(),
        config.actuator_hold_ms,
    );
    let (sequencer, _consumer) = Sequencer::spawn(bank);

    // ── 4. Control service ────────────────────────────────────
    let mut service = ControlService::new(&config, state, sequencer)
        .map_err(|e| anyhow::anyhow!("control service: {e}"))?;

    // The reporting/display/input bridges register their own listeners
    // here once they are linked in; until then a debug heartbeat stands
    // in so the update fan-out is visible on the console.
    let core = service.core();
    service.add_update_listener(Box::new(move || {
        debug!(
            "cycle | T={:.1} target={:.1} pilot={} fire={} fan={}",
            core.current_temp(),
            core.target_temp(),
            core.pilot_on(),
            core.fire_on(),
            core.fan_on(),
        );
    }));

    // ── 5. Run forever ────────────────────────────────────────
    let mut hw = SensorAdapter::new();
    let mut sink = LogEventSink::new();
    service.run(&mut hw, &mut sink)
}
