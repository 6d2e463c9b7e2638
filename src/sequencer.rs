//! Actuator sequencer — the safety state machine.
//!
//! All relay transitions funnel through one unbounded FIFO queue with a
//! single consumer thread, so at most one transition is ever in flight and
//! the mandatory settle holds cannot be preempted. The composite safety
//! invariant — **the burner may only be on while the fan is on** — is
//! enforced here by construction; the policy layer never touches relays.
//!
//! ```text
//!  control loop ──ActionRequest──▶ mpsc queue ──▶ consumer thread
//!                                                 (ActuatorBank)
//! ```
//!
//! Enqueueing is non-blocking and never fails; nothing is dropped, merged,
//! or reordered. Back-to-back duplicates are harmless: the previous-state
//! guards make a repeated transition a cheap no-op, holds included.

use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info, warn};

use crate::app::ports::ActuatorPort;
use crate::app::state::ActuatorFlags;
use crate::drivers::task_pin::{self, Core};

// ───────────────────────────────────────────────────────────────
// Action requests
// ───────────────────────────────────────────────────────────────

/// An actuator-transition intent, enqueued by the policy and consumed
/// exactly once, in FIFO order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRequest {
    /// Fault path: pilot lost. Kill pilot (and burner, with purge) now.
    Shutdown,
    /// Bring the burner up, fan first.
    StartHeating,
    /// Take the burner down, fan last.
    StopHeating,
    /// Re-assert the pilot relay after the flame is confirmed.
    PilotStart,
}

// ───────────────────────────────────────────────────────────────
// ActuatorBank — transition bodies
// ───────────────────────────────────────────────────────────────

/// Owns the actuator port and executes transitions with interlocks and
/// settle holds. Lives on the sequencer's consumer thread; it is the only
/// writer of the shared [`ActuatorFlags`].
pub struct ActuatorBank<P: ActuatorPort> {
    port: P,
    flags: Arc<ActuatorFlags>,
    hold: Duration,
}

impl<P: ActuatorPort> ActuatorBank<P> {
    pub fn new(port: P, flags: Arc<ActuatorFlags>, hold_ms: u32) -> Self {
        Self {
            port,
            flags,
            hold: Duration::from_millis(u64::from(hold_ms)),
        }
    }

    // Relay setters mirror the hardware write into the shared flags and
    // hand back the previous commanded state for the transition guards.

    fn set_pilot(&mut self, on: bool) -> bool {
        let prev = self.port.set_pilot(on);
        self.flags.set_pilot(on);
        prev
    }

    fn set_fire(&mut self, on: bool) -> bool {
        let prev = self.port.set_fire(on);
        self.flags.set_fire(on);
        prev
    }

    fn set_fan(&mut self, on: bool) -> bool {
        let prev = self.port.set_fan(on);
        self.flags.set_fan(on);
        prev
    }

    /// Execute one action to completion, holds included.
    ///
    /// Ordering is what keeps the fire⇒fan invariant: the fan flag goes on
    /// before the fire flag, and the fire flag goes off before the fan
    /// flag, so no observer ever sees the burner alone.
    pub fn execute(&mut self, action: ActionRequest) {
        match action {
            ActionRequest::PilotStart => {
                self.set_pilot(true);
            }

            ActionRequest::StartHeating => {
                // Fan pre-run: if the fan was off, give it the full hold
                // to spin up and establish draft before lighting.
                if !self.set_fan(true) {
                    thread::sleep(self.hold);
                }
                self.set_fire(true);
            }

            ActionRequest::StopHeating => {
                // Purge: if the burner was actually on, keep the fan
                // running for the hold before letting it stop.
                if self.set_fire(false) {
                    thread::sleep(self.hold);
                }
                self.set_fan(false);
            }

            ActionRequest::Shutdown => {
                self.set_pilot(false);
                if self.set_fire(false) {
                    // Normally the policy stops the burner long before the
                    // pilot signal can drop; reaching here means both died
                    // in the same cycle.
                    error!("pilot lost while burner firing — emergency purge");
                    thread::sleep(self.hold);
                    self.set_fan(false);
                }
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Sequencer — queue + consumer thread
// ───────────────────────────────────────────────────────────────

/// Producer handle to the actuator queue.
///
/// Cheap to clone; every clone feeds the same FIFO. The consumer thread
/// exits once every handle is dropped and the queue has drained, which is
/// how tests (and an orderly shutdown) flush it deterministically.
#[derive(Clone)]
pub struct Sequencer {
    tx: Sender<ActionRequest>,
}

impl Sequencer {
    /// Spawn the consumer thread and hand back the producer handle.
    ///
    /// Pinned to the application core: the sequencer must keep draining
    /// while the protocol core is busy with the reporting bridge.
    pub fn spawn<P: ActuatorPort + 'static>(bank: ActuatorBank<P>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel();
        let handle = task_pin::spawn_on_core(Core::App, 5, 4, "actuator-seq\0", move || {
            let mut bank = bank;
            while let Ok(action) = rx.recv() {
                bank.execute(action);
            }
            info!("actuator sequencer: queue closed, consumer exiting");
        });
        (Self { tx }, handle)
    }

    /// Enqueue an action. Non-blocking; the queue is unbounded.
    pub fn enqueue(&self, action: ActionRequest) {
        if self.tx.send(action).is_err() {
            // Only possible if the consumer thread died — which it never
            // does on its own. Loud, but not fatal to the control loop.
            warn!("actuator queue closed; dropping {action:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Instant;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Pilot(bool),
        Fire(bool),
        Fan(bool),
    }

    /// Records every port call with a timestamp; shared so the log stays
    /// readable after the bank (or thread) consumed the port.
    #[derive(Clone, Default)]
    struct RecordingPort {
        calls: Arc<Mutex<Vec<(Call, Instant)>>>,
        pilot: Arc<Mutex<bool>>,
        fire: Arc<Mutex<bool>>,
        fan: Arc<Mutex<bool>>,
    }

    impl RecordingPort {
        fn log(&self) -> Vec<(Call, Instant)> {
            self.calls.lock().unwrap().clone()
        }

        fn sequence(&self) -> Vec<Call> {
            self.log().into_iter().map(|(c, _)| c).collect()
        }
    }

    impl ActuatorPort for RecordingPort {
        fn set_pilot(&mut self, on: bool) -> bool {
            self.calls.lock().unwrap().push((Call::Pilot(on), Instant::now()));
            std::mem::replace(&mut *self.pilot.lock().unwrap(), on)
        }

        fn set_fire(&mut self, on: bool) -> bool {
            self.calls.lock().unwrap().push((Call::Fire(on), Instant::now()));
            std::mem::replace(&mut *self.fire.lock().unwrap(), on)
        }

        fn set_fan(&mut self, on: bool) -> bool {
            self.calls.lock().unwrap().push((Call::Fan(on), Instant::now()));
            std::mem::replace(&mut *self.fan.lock().unwrap(), on)
        }
    }

    const HOLD_MS: u32 = 40;
    const HOLD: Duration = Duration::from_millis(40);
    const SLOP: Duration = Duration::from_millis(25);

    fn bank(port: &RecordingPort) -> (ActuatorBank<RecordingPort>, Arc<ActuatorFlags>) {
        let flags = Arc::new(ActuatorFlags::default());
        (
            ActuatorBank::new(port.clone(), Arc::clone(&flags), HOLD_MS),
            flags,
        )
    }

    #[test]
    fn pilot_start_touches_only_the_pilot() {
        let port = RecordingPort::default();
        let (mut bank, flags) = bank(&port);

        bank.execute(ActionRequest::PilotStart);

        assert_eq!(port.sequence(), vec![Call::Pilot(true)]);
        assert!(flags.pilot() && !flags.fire() && !flags.fan());
    }

    #[test]
    fn start_heating_from_cold_holds_between_fan_and_fire() {
        let port = RecordingPort::default();
        let (mut bank, flags) = bank(&port);

        bank.execute(ActionRequest::StartHeating);

        let log = port.log();
        assert_eq!(log[0].0, Call::Fan(true));
        assert_eq!(log[1].0, Call::Fire(true));
        let gap = log[1].1.duration_since(log[0].1);
        assert!(gap >= HOLD, "fan pre-run hold elided: {gap:?}");
        assert!(flags.fan() && flags.fire());
    }

    #[test]
    fn start_heating_with_fan_running_skips_the_hold() {
        let port = RecordingPort::default();
        let (mut bank, _flags) = bank(&port);

        bank.execute(ActionRequest::StartHeating);
        let before = Instant::now();
        bank.execute(ActionRequest::StartHeating);
        assert!(
            before.elapsed() < SLOP,
            "repeat StartHeating must not re-run the pre-light hold"
        );
    }

    #[test]
    fn stop_heating_purges_before_stopping_the_fan() {
        let port = RecordingPort::default();
        let (mut bank, flags) = bank(&port);

        bank.execute(ActionRequest::StartHeating);
        bank.execute(ActionRequest::StopHeating);

        let log = port.log();
        assert_eq!(log[2].0, Call::Fire(false));
        assert_eq!(log[3].0, Call::Fan(false));
        let gap = log[3].1.duration_since(log[2].1);
        assert!(gap >= HOLD, "purge hold elided: {gap:?}");
        assert!(!flags.fire() && !flags.fan());
    }

    #[test]
    fn stop_heating_without_fire_stops_the_fan_immediately() {
        let port = RecordingPort::default();
        let (mut bank, flags) = bank(&port);

        let before = Instant::now();
        bank.execute(ActionRequest::StopHeating);
        assert!(before.elapsed() < SLOP);
        assert_eq!(port.sequence(), vec![Call::Fire(false), Call::Fan(false)]);
        assert!(!flags.fan());
    }

    #[test]
    fn shutdown_when_idle_leaves_the_fan_alone() {
        let port = RecordingPort::default();
        let (mut bank, flags) = bank(&port);

        bank.execute(ActionRequest::PilotStart);
        bank.execute(ActionRequest::Shutdown);

        assert_eq!(
            port.sequence(),
            vec![Call::Pilot(true), Call::Pilot(false), Call::Fire(false)]
        );
        assert!(!flags.pilot());
    }

    #[test]
    fn shutdown_while_firing_purges_then_kills_the_fan() {
        let port = RecordingPort::default();
        let (mut bank, flags) = bank(&port);

        bank.execute(ActionRequest::StartHeating);
        bank.execute(ActionRequest::Shutdown);

        let log = port.log();
        let tail: Vec<Call> = log[2..].iter().map(|(c, _)| *c).collect();
        assert_eq!(tail, vec![Call::Pilot(false), Call::Fire(false), Call::Fan(false)]);
        let gap = log[4].1.duration_since(log[3].1);
        assert!(gap >= HOLD, "emergency purge hold elided: {gap:?}");
        assert!(!flags.pilot() && !flags.fire() && !flags.fan());
    }

    #[test]
    fn shutdown_with_fan_but_no_fire_keeps_the_fan_running() {
        let port = RecordingPort::default();
        let (mut bank, flags) = bank(&port);

        // Fan on, burner off — e.g. mid-purge state re-requested.
        bank.set_fan(true);
        bank.execute(ActionRequest::Shutdown);
        assert!(flags.fan(), "fan is only forced off when fire was burning");
    }

    #[test]
    fn queue_is_fifo_through_the_consumer_thread() {
        let port = RecordingPort::default();
        let flags = Arc::new(ActuatorFlags::default());
        let bank = ActuatorBank::new(port.clone(), Arc::clone(&flags), 1);
        let (seq, handle) = Sequencer::spawn(bank);

        seq.enqueue(ActionRequest::PilotStart);
        seq.enqueue(ActionRequest::StartHeating);
        seq.enqueue(ActionRequest::StopHeating);
        drop(seq);
        handle.join().unwrap();

        assert_eq!(
            port.sequence(),
            vec![
                Call::Pilot(true),
                Call::Fan(true),
                Call::Fire(true),
                Call::Fire(false),
                Call::Fan(false),
            ]
        );
        assert!(flags.pilot() && !flags.fire() && !flags.fan());
    }

    #[test]
    fn cloned_producers_feed_one_queue() {
        let port = RecordingPort::default();
        let flags = Arc::new(ActuatorFlags::default());
        let bank = ActuatorBank::new(port.clone(), flags, 1);
        let (seq, handle) = Sequencer::spawn(bank);

        let seq2 = seq.clone();
        seq.enqueue(ActionRequest::PilotStart);
        seq2.enqueue(ActionRequest::StartHeating);
        drop(seq);
        drop(seq2);
        handle.join().unwrap();

        assert_eq!(
            port.sequence(),
            vec![Call::Pilot(true), Call::Fan(true), Call::Fire(true)]
        );
    }
}
