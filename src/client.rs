//! The seam to the external policy/RASP engine.
//!
//! This crate never decides on its own whether a request is blocked. It asks
//! a [`PolicyDecisionClient`] and acts on the answer. Production wiring
//! supplies a client backed by the real engine; tests supply stubs.
//!
//! - [`DetachedClient`]: the engine is not loaded; every request proceeds
//! - [`TimeoutClient`]: bounds how long a decision may take

mod timeout;

pub use timeout::{TimeoutClient, DEFAULT_MAX_IN_FLIGHT};

use crate::context::SecurityContext;
use crate::decision::BlockDecision;
use crate::identity::CallerIdentity;

/// Capability-checked interface to the policy collaborator.
///
/// Implementations must be shareable across request threads.
///
/// # Examples
///
/// ```
/// use request_gate::{BlockDecision, CallerIdentity, PolicyDecisionClient, SecurityContext};
///
/// /// Blocks every caller registered with id 13.
/// struct BlockThirteen;
///
/// impl PolicyDecisionClient for BlockThirteen {
///     fn is_available(&self) -> bool {
///         true
///     }
///
///     fn register_identity(&self, _identity: &CallerIdentity) {}
///
///     fn evaluate_request(&self, ctx: &SecurityContext) -> Option<BlockDecision> {
///         match ctx.identity() {
///             Some(identity) if identity.id == 13 => Some(BlockDecision::blocked_user()),
///             _ => Some(BlockDecision::allow()),
///         }
///     }
/// }
/// ```
pub trait PolicyDecisionClient: Send + Sync {
    /// Returns true if the engine is loaded and able to decide.
    fn is_available(&self) -> bool;

    /// Tells the engine who the caller is.
    ///
    /// Only called when [`is_available`](Self::is_available) returned true.
    fn register_identity(&self, identity: &CallerIdentity);

    /// Asks the engine whether the request described by `ctx` must be stopped.
    ///
    /// `None` means the engine had nothing to say; the request proceeds.
    fn evaluate_request(&self, ctx: &SecurityContext) -> Option<BlockDecision>;
}

/// A client standing in for an engine that is not loaded.
///
/// Unavailable, ignores registrations, never decides.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedClient;

impl PolicyDecisionClient for DetachedClient {
    fn is_available(&self) -> bool {
        false
    }

    fn register_identity(&self, _identity: &CallerIdentity) {}

    fn evaluate_request(&self, _ctx: &SecurityContext) -> Option<BlockDecision> {
        None
    }
}
