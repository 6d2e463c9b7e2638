//! Thermostat policy.
//!
//! Converts the cycle's filtered inputs into zero or more actuator
//! intents. Pure given its inputs plus the actuator-state snapshot — the
//! relays themselves are only ever touched by the sequencer.
//!
//! Priority order, first applicable wins:
//! 1. pilot lost → `Shutdown`, nothing else this cycle;
//! 2. pilot present but relay off → `PilotStart` (evaluation continues);
//! 3. away mode → stop the burner if it runs; heating stays suppressed
//!    regardless of temperature;
//! 4. below `target − delta` with burner off → `StartHeating`;
//! 5. above `target + delta` with burner on → `StopHeating`;
//! 6. a pending manual operation, consumed exactly once.
//!
//! The `[target − delta, target + delta]` band is a dead zone: strict
//! comparisons keep the boundaries inside it, so the burner never chatters
//! around the setpoint.

use log::{debug, warn};

use crate::app::state::{ActuatorSnapshot, PendingOperation, SettingsSnapshot};
use crate::sequencer::ActionRequest;

/// What one policy evaluation decided.
#[derive(Debug, Default)]
pub struct Decision {
    /// Intents for the sequencer, in enqueue order. At most two per cycle
    /// (`PilotStart` plus one thermal action).
    pub actions: heapless::Vec<ActionRequest, 2>,
    /// Whether the caller must reset the pending manual operation — a
    /// manual override is consumed even when it could not be applied.
    pub consume_pending: bool,
}

impl Decision {
    fn push(&mut self, action: ActionRequest) {
        // Capacity 2 is structural: shutdown short-circuits, and only one
        // thermal action can follow a PilotStart.
        let _ = self.actions.push(action);
    }
}

/// Evaluate one control cycle.
pub fn decide(
    pilot_present: bool,
    current_temp_c: f32,
    settings: &SettingsSnapshot,
    actuators: ActuatorSnapshot,
) -> Decision {
    let mut decision = Decision::default();

    // 1. Pilot loss overrides everything, every cycle, regardless of any
    //    other setting. The pending override survives for the relight.
    if !pilot_present {
        decision.push(ActionRequest::Shutdown);
        return decision;
    }

    // 2. Flame confirmed but relay off (boot, or after a shutdown that
    //    turned out to be a sensor dropout): re-assert it. The heating
    //    decision below still runs this same cycle without waiting for
    //    the pilot transition to complete.
    if !actuators.pilot {
        decision.push(ActionRequest::PilotStart);
    }

    // 3. Away mode suppresses heating no matter what the tank reads.
    if settings.away_mode {
        if actuators.fire {
            decision.push(ActionRequest::StopHeating);
        }
        return decision;
    }

    let below = current_temp_c < settings.target_temp_c - settings.target_delta_c;
    let above = current_temp_c > settings.target_temp_c + settings.target_delta_c;

    // 4./5. Hysteresis band.
    if below && !actuators.fire {
        decision.push(ActionRequest::StartHeating);
    } else if above && actuators.fire {
        decision.push(ActionRequest::StopHeating);
    } else if settings.pending != PendingOperation::None {
        // 6. Manual override, consumed exactly once even when it cannot
        //    be applied.
        match (settings.pending, actuators.fire) {
            (PendingOperation::Heating, false) => decision.push(ActionRequest::StartHeating),
            (PendingOperation::Idle, true) => decision.push(ActionRequest::StopHeating),
            (PendingOperation::Unrecognized, _) => {
                warn!("unrecognized manual operation — ignoring");
            }
            (op, fire) => {
                debug!("manual operation {op:?} already satisfied (fire={fire})");
            }
        }
        decision.consume_pending = true;
    }

    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SettingsSnapshot {
        SettingsSnapshot {
            target_temp_c: 50.0,
            target_delta_c: 5.0,
            away_mode: false,
            pending: PendingOperation::None,
        }
    }

    fn steady() -> ActuatorSnapshot {
        ActuatorSnapshot {
            pilot: true,
            fire: false,
            fan: false,
        }
    }

    fn firing() -> ActuatorSnapshot {
        ActuatorSnapshot {
            pilot: true,
            fire: true,
            fan: true,
        }
    }

    fn actions(d: &Decision) -> Vec<ActionRequest> {
        d.actions.iter().copied().collect()
    }

    // ── Pilot priority ────────────────────────────────────────

    #[test]
    fn pilot_loss_shuts_down_and_suppresses_everything() {
        let mut s = settings();
        s.away_mode = true;
        s.pending = PendingOperation::Heating;

        let d = decide(false, 10.0, &s, firing());
        assert_eq!(actions(&d), vec![ActionRequest::Shutdown]);
        assert!(!d.consume_pending, "override must survive a pilot loss");
    }

    #[test]
    fn pilot_relay_reasserted_alongside_heating_decision() {
        let snap = ActuatorSnapshot {
            pilot: false,
            fire: false,
            fan: false,
        };
        let d = decide(true, 40.0, &settings(), snap);
        assert_eq!(
            actions(&d),
            vec![ActionRequest::PilotStart, ActionRequest::StartHeating],
            "heating is evaluated in the same cycle as the pilot re-assert"
        );
    }

    #[test]
    fn lit_pilot_with_relay_on_requests_nothing_in_band() {
        let d = decide(true, 50.0, &settings(), steady());
        assert!(actions(&d).is_empty());
    }

    // ── Hysteresis band (target 50, delta 5) ──────────────────

    #[test]
    fn below_band_starts_heating() {
        let d = decide(true, 44.9, &settings(), steady());
        assert_eq!(actions(&d), vec![ActionRequest::StartHeating]);
    }

    #[test]
    fn low_edge_of_band_is_dead() {
        let d = decide(true, 45.1, &settings(), steady());
        assert!(actions(&d).is_empty());

        // Exactly target − delta: strict `<`, still dead.
        let d = decide(true, 45.0, &settings(), steady());
        assert!(actions(&d).is_empty());
    }

    #[test]
    fn above_band_stops_heating() {
        let d = decide(true, 55.1, &settings(), firing());
        assert_eq!(actions(&d), vec![ActionRequest::StopHeating]);
    }

    #[test]
    fn high_edge_of_band_is_dead() {
        let d = decide(true, 54.9, &settings(), firing());
        assert!(actions(&d).is_empty());

        let d = decide(true, 55.0, &settings(), firing());
        assert!(actions(&d).is_empty());
    }

    #[test]
    fn cold_with_burner_already_on_requests_nothing() {
        let d = decide(true, 40.0, &settings(), firing());
        assert!(actions(&d).is_empty());
    }

    #[test]
    fn hot_with_burner_off_requests_nothing() {
        let d = decide(true, 60.0, &settings(), steady());
        assert!(actions(&d).is_empty());
    }

    // ── Away mode ─────────────────────────────────────────────

    #[test]
    fn away_stops_a_running_burner() {
        let mut s = settings();
        s.away_mode = true;
        let d = decide(true, 40.0, &s, firing());
        assert_eq!(actions(&d), vec![ActionRequest::StopHeating]);
    }

    #[test]
    fn away_suppresses_heating_even_when_cold() {
        let mut s = settings();
        s.away_mode = true;
        let d = decide(true, 10.0, &s, steady());
        assert!(actions(&d).is_empty());
    }

    #[test]
    fn away_leaves_pending_operation_for_later() {
        let mut s = settings();
        s.away_mode = true;
        s.pending = PendingOperation::Heating;
        let d = decide(true, 50.0, &s, steady());
        assert!(!d.consume_pending);
    }

    // ── Manual override ───────────────────────────────────────

    #[test]
    fn pending_heating_starts_burner_in_band() {
        let mut s = settings();
        s.pending = PendingOperation::Heating;
        let d = decide(true, 50.0, &s, steady());
        assert_eq!(actions(&d), vec![ActionRequest::StartHeating]);
        assert!(d.consume_pending);
    }

    #[test]
    fn pending_idle_stops_burner_in_band() {
        let mut s = settings();
        s.pending = PendingOperation::Idle;
        let d = decide(true, 50.0, &s, firing());
        assert_eq!(actions(&d), vec![ActionRequest::StopHeating]);
        assert!(d.consume_pending);
    }

    #[test]
    fn pending_heating_with_burner_on_is_consumed_without_action() {
        let mut s = settings();
        s.pending = PendingOperation::Heating;
        let d = decide(true, 50.0, &s, firing());
        assert!(actions(&d).is_empty());
        assert!(d.consume_pending, "an inapplicable override is still spent");
    }

    #[test]
    fn pending_idle_with_burner_off_is_consumed_without_action() {
        let mut s = settings();
        s.pending = PendingOperation::Idle;
        let d = decide(true, 50.0, &s, steady());
        assert!(actions(&d).is_empty());
        assert!(d.consume_pending);
    }

    #[test]
    fn unrecognized_operation_is_discarded() {
        let mut s = settings();
        s.pending = PendingOperation::Unrecognized;
        let d = decide(true, 50.0, &s, steady());
        assert!(actions(&d).is_empty());
        assert!(d.consume_pending);
    }

    #[test]
    fn hysteresis_outranks_manual_override() {
        let mut s = settings();
        s.pending = PendingOperation::Idle;
        // Cold tank: the band decision wins the cycle and the override
        // stays pending for the next one.
        let d = decide(true, 40.0, &s, steady());
        assert_eq!(actions(&d), vec![ActionRequest::StartHeating]);
        assert!(!d.consume_pending);
    }
}
