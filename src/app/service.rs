//! Control service — the periodic sample → decide → enqueue → notify cycle.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────────┐
//!                 │       ControlService         │──▶ EventSink
//!                 │ Sampler · PilotFilter ·      │──▶ UpdateBus listeners
//!                 │ Thermostat policy            │
//!                 └─────────────┬───────────────┘
//!                               │ ActionRequest (non-blocking enqueue)
//!                               ▼
//!                        Actuator sequencer (own thread)
//! ```
//!
//! The service never blocks on actuator work: transitions and their settle
//! holds run on the sequencer's thread, so temperature monitoring and
//! pilot-loss detection continue even mid-transition. Listeners may
//! therefore observe actuator flags that lag a queued transition by up to
//! one hold.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::info;

use crate::app::bus::{UpdateBus, UpdateListener};
use crate::app::events::{AppEvent, TelemetryData};
use crate::app::ports::{EventSink, SensorPort};
use crate::app::state::CoreState;
use crate::config::SystemConfig;
use crate::control::thermostat;
use crate::drivers::watchdog::Watchdog;
use crate::error::Result;
use crate::sensors::pilot::PilotFilter;
use crate::sensors::thermo::{self, ThermoCalibration};
use crate::sensors::Sampler;
use crate::sequencer::Sequencer;

/// Owns the per-cycle orchestration and the process-lifetime run loop.
pub struct ControlService {
    state: Arc<CoreState>,
    sampler: Sampler,
    filter: PilotFilter,
    calibration: ThermoCalibration,
    sequencer: Sequencer,
    bus: UpdateBus,
    watchdog: Watchdog,
    period: Duration,
    cycle_count: u64,
}

impl ControlService {
    /// Construct the service. Fails if the configuration is unusable.
    pub fn new(
        config: &SystemConfig,
        state: Arc<CoreState>,
        sequencer: Sequencer,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state,
            sampler: Sampler::new(config.adc_settle_ms),
            filter: PilotFilter::new(config.pilot_on_threshold),
            calibration: ThermoCalibration::new(config.thermo_mult, config.thermo_offset),
            sequencer,
            bus: UpdateBus::new(),
            watchdog: Watchdog::new(),
            period: Duration::from_millis(u64::from(config.control_loop_interval_ms)),
            cycle_count: 0,
        })
    }

    /// Register an update listener. Must happen before [`run`] — there is
    /// no registration (or unregistration) once the loop is spinning.
    pub fn add_update_listener(&mut self, listener: UpdateListener) {
        self.bus.add_listener(listener);
    }

    /// Shared core state handle (for wiring external bridges in `main`).
    pub fn core(&self) -> Arc<CoreState> {
        Arc::clone(&self.state)
    }

    /// Total control cycles completed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Run one full control cycle.
    pub fn tick(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) {
        self.cycle_count += 1;

        // 1. Timed sampling pass.
        let reading = self.sampler.sample(hw);

        // 2. Condition the signals and commit the cycle's readings.
        self.filter.update(reading.pilot_raw);
        let temp_c = self
            .calibration
            .celsius(thermo::average(reading.thermo1, reading.thermo2));
        self.state.record_sample(&reading, temp_c);

        // 3. Decide and hand intents to the sequencer. Enqueueing never
        //    blocks; execution happens on the sequencer's own thread.
        let decision = thermostat::decide(
            self.filter.is_pilot_present(),
            temp_c,
            &self.state.settings_snapshot(),
            self.state.actuators().snapshot(),
        );
        for &action in &decision.actions {
            sink.emit(&AppEvent::ActionRequested(action));
            self.sequencer.enqueue(action);
        }
        if decision.consume_pending {
            self.state.clear_pending_operation();
        }

        // 4. Fan out to observers with the readings committed. Actuator
        //    flags may still reflect the pre-transition state.
        sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        self.bus.notify_all();
    }

    /// The process-lifetime control loop: sleep one period, then cycle.
    /// Never returns; there is no termination path short of power-off.
    pub fn run(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) -> ! {
        sink.emit(&AppEvent::Started);
        info!(
            "control loop running (period {} ms, {} update listeners)",
            self.period.as_millis(),
            self.bus.len()
        );
        loop {
            thread::sleep(self.period);
            self.tick(hw, sink);
            self.watchdog.feed();
        }
    }

    fn build_telemetry(&self) -> TelemetryData {
        let (thermo1_raw, thermo2_raw, pilot_raw) = self.state.last_reading();
        let actuators = self.state.actuators().snapshot();
        TelemetryData {
            current_temp_c: self.state.current_temp(),
            target_temp_c: self.state.target_temp(),
            target_delta_c: self.state.target_delta(),
            pilot_smoothed: self.filter.smoothed(),
            pilot_present: self.filter.is_pilot_present(),
            pilot_on: actuators.pilot,
            fire_on: actuators.fire,
            fan_on: actuators.fan,
            away_mode: self.state.away_mode(),
            thermo1_raw,
            thermo2_raw,
            pilot_raw,
        }
    }
}
