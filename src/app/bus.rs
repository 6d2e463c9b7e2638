//! Per-cycle update fan-out.
//!
//! A plain observer list: external components (reporting bridge, display)
//! register a no-argument callback once at startup and get poked after
//! every completed control cycle, in registration order. Listeners pull
//! whatever they need from `CoreState` — nothing is pushed through the
//! callback itself, and nothing a listener does can fail the control loop.

/// A registered update listener.
pub type UpdateListener = Box<dyn FnMut() + Send>;

/// Insertion-ordered, non-unique collection of update listeners.
#[derive(Default)]
pub struct UpdateBus {
    listeners: Vec<UpdateListener>,
}

impl UpdateBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. There is no unregistration — listeners live as
    /// long as the process.
    pub fn add_listener(&mut self, listener: UpdateListener) {
        self.listeners.push(listener);
    }

    /// Invoke every listener synchronously, in registration order.
    pub fn notify_all(&mut self) {
        for listener in &mut self.listeners {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn notifies_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut bus = UpdateBus::new();

        for tag in ["display", "mqtt", "log"] {
            let order = Arc::clone(&order);
            bus.add_listener(Box::new(move || order.lock().unwrap().push(tag)));
        }

        bus.notify_all();
        bus.notify_all();
        assert_eq!(
            *order.lock().unwrap(),
            vec!["display", "mqtt", "log", "display", "mqtt", "log"]
        );
    }

    #[test]
    fn duplicate_registrations_are_kept() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut bus = UpdateBus::new();

        for _ in 0..3 {
            let hits = Arc::clone(&hits);
            bus.add_listener(Box::new(move || {
                hits.fetch_add(1, Ordering::Relaxed);
            }));
        }
        assert_eq!(bus.len(), 3);

        bus.notify_all();
        assert_eq!(hits.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn empty_bus_is_a_no_op() {
        let mut bus = UpdateBus::new();
        assert!(bus.is_empty());
        bus.notify_all();
    }
}
