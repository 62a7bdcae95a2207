//! Bounded-latency wrapper around a policy collaborator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::PolicyDecisionClient;
use crate::context::SecurityContext;
use crate::decision::BlockDecision;
use crate::identity::CallerIdentity;

/// Default cap on concurrent decision workers.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// Wraps a collaborator so that a decision never takes longer than `timeout`.
///
/// The evaluation runs on a short-lived worker thread. If it does not answer
/// in time, panics, or the worker cannot be spawned, the wrapper reports no
/// decision and the request proceeds. A late answer is discarded.
///
/// A hung engine keeps its worker blocked. At most `max_in_flight` workers
/// exist at once, shared by all clones; past that cap, decisions are skipped
/// without spawning until a worker returns.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use request_gate::{DetachedClient, PolicyDecisionClient, SecurityContext, TimeoutClient};
///
/// let client = TimeoutClient::new(Arc::new(DetachedClient), Duration::from_millis(25));
/// assert!(client.evaluate_request(&SecurityContext::new("req-1")).is_none());
/// ```
#[derive(Clone)]
pub struct TimeoutClient {
    inner: Arc<dyn PolicyDecisionClient>,
    timeout: Duration,
    max_in_flight: usize,
    in_flight: Arc<AtomicUsize>,
}

impl TimeoutClient {
    /// Wraps `inner`, bounding each decision by `timeout`.
    ///
    /// Allows [`DEFAULT_MAX_IN_FLIGHT`] concurrent workers.
    pub fn new(inner: Arc<dyn PolicyDecisionClient>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sets the number of decision workers allowed to run at once.
    ///
    /// A cap of zero skips every decision.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Returns the decision bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the worker cap.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Returns the number of workers still running, including abandoned ones.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Option<InFlight> {
        self.in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < self.max_in_flight).then_some(count + 1)
            })
            .ok()
            .map(|_| InFlight(Arc::clone(&self.in_flight)))
    }
}

// Releases one worker slot on drop, including during unwinding
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl std::fmt::Debug for TimeoutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutClient")
            .field("timeout", &self.timeout)
            .field("max_in_flight", &self.max_in_flight)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl PolicyDecisionClient for TimeoutClient {
    fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    fn register_identity(&self, identity: &CallerIdentity) {
        self.inner.register_identity(identity);
    }

    fn evaluate_request(&self, ctx: &SecurityContext) -> Option<BlockDecision> {
        let Some(slot) = self.acquire() else {
            ctx.log().warn(format_args!(
                "{} policy decisions already in flight, proceeding",
                self.max_in_flight
            ));
            return None;
        };

        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let worker_ctx = ctx.clone();

        let spawned = thread::Builder::new()
            .name("policy-decision".to_string())
            .spawn(move || {
                let _slot = slot;
                // Receiver may be gone after a timeout
                let _ = tx.send(inner.evaluate_request(&worker_ctx));
            });

        if let Err(err) = spawned {
            ctx.log()
                .warn(format_args!("policy decision worker failed to start: {}", err));
            return None;
        }

        match rx.recv_timeout(self.timeout) {
            Ok(decision) => decision,
            Err(RecvTimeoutError::Timeout) => {
                ctx.log().warn(format_args!(
                    "policy decision timed out after {}ms, proceeding",
                    self.timeout.as_millis()
                ));
                None
            }
            Err(RecvTimeoutError::Disconnected) => {
                ctx.log()
                    .warn(format_args!("policy decision worker panicked, proceeding"));
                None
            }
        }
    }
}
