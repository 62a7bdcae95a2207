//! In-memory audit trail recorder.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use super::AuditEvent;
use crate::logging::RequestLog;

/// Number of events [`AuditTrail::new`] keeps before dropping the oldest.
pub const DEFAULT_AUDIT_CAPACITY: usize = 10_000;

/// In-memory recorder for audit events.
///
/// Shared between request threads behind an `Arc`. The trail holds at most
/// `capacity` events; once full, recording a new event drops the oldest. In
/// production you would typically forward events to a persistent audit sink
/// instead.
///
/// # Example
///
/// ```
/// use request_gate::audit::{AuditTrail, AuditEvent, AuditOutcome};
///
/// let trail = AuditTrail::new();
/// trail.record(AuditEvent::new("req-123", "/", AuditOutcome::FailOpen));
///
/// assert_eq!(trail.events().len(), 1);
/// ```
#[derive(Debug)]
pub struct AuditTrail {
    events: Mutex<VecDeque<AuditEvent>>,
    capacity: usize,
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_AUDIT_CAPACITY)
    }
}

impl AuditTrail {
    /// Creates a new empty audit trail holding [`DEFAULT_AUDIT_CAPACITY`] events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty audit trail holding at most `capacity` events.
    ///
    /// A capacity of zero logs events without keeping them.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// Returns the maximum number of events kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records an audit event.
    ///
    /// Events are stored in the order they are recorded.
    pub fn record(&self, event: AuditEvent) {
        RequestLog::new(event.request_id()).info(format_args!("audit {}", event));

        if self.capacity == 0 {
            return;
        }
        let mut events = self.lock();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Returns a snapshot of the retained events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.lock().iter().cloned().collect()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock leaves the Vec intact
    fn lock(&self) -> MutexGuard<'_, VecDeque<AuditEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditOutcome;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn audit_trail_starts_empty() {
        let trail = AuditTrail::new();
        assert!(trail.is_empty());
        assert_eq!(trail.len(), 0);
    }

    #[test]
    fn audit_trail_records_in_order() {
        let trail = AuditTrail::new();

        trail.record(AuditEvent::new("req-1", "/", AuditOutcome::Allowed));
        trail.record(AuditEvent::new("req-2", "/", AuditOutcome::Blocked));

        let events = trail.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].request_id(), "req-1");
        assert_eq!(events[1].request_id(), "req-2");
    }

    #[test]
    fn audit_trail_can_be_cleared() {
        let trail = AuditTrail::new();
        trail.record(AuditEvent::new("req-1", "/", AuditOutcome::FailOpen));

        trail.clear();

        assert!(trail.is_empty());
    }

    #[test]
    fn full_trail_drops_oldest_event() {
        let trail = AuditTrail::with_capacity(2);

        for i in 0..5 {
            trail.record(AuditEvent::new(format!("req-{}", i), "/", AuditOutcome::Allowed));
        }

        let ids: Vec<_> = trail.events().iter().map(|e| e.request_id().to_string()).collect();
        assert_eq!(ids, ["req-3", "req-4"]);
        assert_eq!(trail.len(), trail.capacity());
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let trail = AuditTrail::with_capacity(0);
        trail.record(AuditEvent::new("req-1", "/", AuditOutcome::Blocked));

        assert!(trail.is_empty());
    }

    #[test]
    fn default_capacity() {
        assert_eq!(AuditTrail::new().capacity(), DEFAULT_AUDIT_CAPACITY);
    }

    #[test]
    fn audit_trail_is_shareable_across_threads() {
        let trail = Arc::new(AuditTrail::new());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let trail = Arc::clone(&trail);
                thread::spawn(move || {
                    trail.record(AuditEvent::new(format!("req-{}", i), "/", AuditOutcome::Allowed));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(trail.len(), 4);
    }
}
