//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production). The MQTT reporting
//! bridge does not hang off this sink — it observes the core through
//! `CoreState` and the update bus.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | control service up");
            }
            AppEvent::ActionRequested(action) => {
                info!("ACTION | {:?} queued", action);
            }
            AppEvent::Telemetry(t) => {
                // Per-cycle at 1 Hz — keep it at debug so a production
                // console stays readable.
                debug!(
                    "TELEM | T={:.1}\u{00b0}C (target {:.1}\u{00b1}{:.1}) | \
                     pilot={} ({}, adc={}) | fire={} fan={} | away={} | \
                     raw=({}, {}, {})",
                    t.current_temp_c,
                    t.target_temp_c,
                    t.target_delta_c,
                    if t.pilot_on { "EN" } else { "off" },
                    if t.pilot_present { "lit" } else { "dark" },
                    t.pilot_smoothed,
                    if t.fire_on { "ON" } else { "off" },
                    if t.fan_on { "ON" } else { "off" },
                    if t.away_mode { "yes" } else { "no" },
                    t.thermo1_raw,
                    t.thermo2_raw,
                    t.pilot_raw,
                );
            }
        }
    }
}
