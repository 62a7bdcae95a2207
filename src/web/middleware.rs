//! Access-control middleware acting on the collaborator's blocking decision.
//!
//! The middleware asks the [`PolicyDecisionClient`] whether the current
//! request must be stopped and translates the answer into an [`Action`]:
//!
//! ```text
//! collaborator unavailable            -> Proceed (fail-open)
//! no decision / block = false         -> Proceed
//! blocked      + user                 -> 403 "Your user is blocked!"
//! blocked      + ip                   -> 403 "Your IP (..) is blocked due to: ..!"
//! ratelimited  + user                 -> 429 "Your user exceeded the rate limit ..."
//! ratelimited  + ip                   -> 429 "Your IP (..) exceeded the rate limit ..."
//! anything else with block = true     -> 429 "Blocked! " + decision JSON
//! ```
//!
//! A blocking decision is never dropped: every unrecognised combination lands
//! on the catch-all row.

use std::sync::Arc;

use crate::audit::AuditOutcome;
use crate::client::PolicyDecisionClient;
use crate::context::SecurityContext;
use crate::decision::{BlockDecision, BlockKind, BlockTrigger};
use crate::response::{HttpResponse, FORBIDDEN, TOO_MANY_REQUESTS};

/// What the pipeline must do after access control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Invoke the route handler
    Proceed,
    /// Return this response without invoking the route handler
    ShortCircuit(HttpResponse),
}

impl Action {
    /// Returns true for [`Action::Proceed`].
    pub fn is_proceed(&self) -> bool {
        matches!(self, Action::Proceed)
    }
}

/// Result of one access-control check, with the outcome kept for auditing.
#[derive(Debug, Clone)]
pub(crate) struct Check {
    pub(crate) action: Action,
    pub(crate) outcome: AuditOutcome,
    pub(crate) trigger: Option<BlockTrigger>,
}

/// Consults the policy collaborator and short-circuits blocked requests.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use request_gate::web::{AccessControlMiddleware, Action};
/// use request_gate::{DetachedClient, SecurityContext};
///
/// // No engine loaded: every request proceeds.
/// let middleware = AccessControlMiddleware::new(Arc::new(DetachedClient));
/// assert_eq!(middleware.authorize(&SecurityContext::new("req-1")), Action::Proceed);
/// ```
#[derive(Clone)]
pub struct AccessControlMiddleware {
    client: Arc<dyn PolicyDecisionClient>,
}

impl AccessControlMiddleware {
    /// Creates the middleware around a collaborator.
    pub fn new(client: Arc<dyn PolicyDecisionClient>) -> Self {
        Self { client }
    }

    /// Decides whether the request described by `ctx` may proceed.
    ///
    /// Never fails; the worst case is fail-open.
    pub fn authorize(&self, ctx: &SecurityContext) -> Action {
        self.check(ctx).action
    }

    pub(crate) fn check(&self, ctx: &SecurityContext) -> Check {
        let log = ctx.log();

        if !self.client.is_available() {
            log.debug(format_args!("policy engine unavailable, proceeding"));
            return Check {
                action: Action::Proceed,
                outcome: AuditOutcome::FailOpen,
                trigger: None,
            };
        }

        let decision = match self.client.evaluate_request(ctx) {
            Some(decision) if decision.should_block => decision,
            _ => {
                log.debug(format_args!("no blocking decision"));
                return Check {
                    action: Action::Proceed,
                    outcome: AuditOutcome::Allowed,
                    trigger: None,
                };
            }
        };

        let (outcome, response) = block_response(&decision);
        log.info(format_args!(
            "short-circuit type={} trigger={} status={}",
            decision.kind, decision.trigger, response.status
        ));

        Check {
            action: Action::ShortCircuit(response),
            outcome,
            trigger: Some(decision.trigger),
        }
    }
}

impl std::fmt::Debug for AccessControlMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControlMiddleware")
            .finish_non_exhaustive()
    }
}

/// Maps a blocking decision to its short-circuit response.
///
/// Callers are expected to have checked `should_block`; the mapping itself
/// only looks at `kind` and `trigger`.
///
/// # Examples
///
/// ```
/// use request_gate::web::block_response;
/// use request_gate::BlockDecision;
///
/// let (_, response) = block_response(&BlockDecision::blocked_ip("1.2.3.4", "abuse"));
/// assert_eq!(response.status, 403);
/// assert_eq!(response.body, "Your IP (1.2.3.4) is blocked due to: abuse!");
/// ```
pub fn block_response(decision: &BlockDecision) -> (AuditOutcome, HttpResponse) {
    let ip = decision.ip.as_deref().unwrap_or_default();

    match (decision.kind, decision.trigger) {
        (BlockKind::Blocked, BlockTrigger::User) => (
            AuditOutcome::Blocked,
            HttpResponse::text(FORBIDDEN, "Your user is blocked!"),
        ),
        (BlockKind::Blocked, BlockTrigger::Ip) => (
            AuditOutcome::Blocked,
            HttpResponse::text(
                FORBIDDEN,
                format!(
                    "Your IP ({}) is blocked due to: {}!",
                    ip,
                    decision.description.as_deref().unwrap_or_default()
                ),
            ),
        ),
        (BlockKind::RateLimited, BlockTrigger::User) => (
            AuditOutcome::RateLimited,
            HttpResponse::text(
                TOO_MANY_REQUESTS,
                "Your user exceeded the rate limit for this endpoint!",
            ),
        ),
        (BlockKind::RateLimited, BlockTrigger::Ip) => (
            AuditOutcome::RateLimited,
            HttpResponse::text(
                TOO_MANY_REQUESTS,
                format!("Your IP ({}) exceeded the rate limit for this endpoint!", ip),
            ),
        ),
        _ => (
            AuditOutcome::Unclassified,
            HttpResponse::text(TOO_MANY_REQUESTS, format!("Blocked! {}", decision.to_json())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::CallerIdentity;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        available: bool,
        decision: Option<BlockDecision>,
    }

    impl PolicyDecisionClient for Fixed {
        fn is_available(&self) -> bool {
            self.available
        }

        fn register_identity(&self, _identity: &CallerIdentity) {}

        fn evaluate_request(&self, _ctx: &SecurityContext) -> Option<BlockDecision> {
            self.decision.clone()
        }
    }

    fn middleware(available: bool, decision: Option<BlockDecision>) -> AccessControlMiddleware {
        AccessControlMiddleware::new(Arc::new(Fixed { available, decision }))
    }

    fn short_circuit(action: Action) -> HttpResponse {
        match action {
            Action::ShortCircuit(response) => response,
            Action::Proceed => panic!("expected short-circuit"),
        }
    }

    #[test]
    fn unavailable_engine_fails_open() {
        let mw = middleware(false, Some(BlockDecision::blocked_user()));
        let check = mw.check(&SecurityContext::new("req-1"));

        assert!(check.action.is_proceed());
        assert_eq!(check.outcome, AuditOutcome::FailOpen);
    }

    #[test]
    fn absent_decision_proceeds() {
        let mw = middleware(true, None);
        let check = mw.check(&SecurityContext::new("req-2"));

        assert!(check.action.is_proceed());
        assert_eq!(check.outcome, AuditOutcome::Allowed);
    }

    #[test]
    fn non_blocking_decision_proceeds_whatever_its_kind() {
        let mut decision = BlockDecision::blocked_user();
        decision.should_block = false;

        let mw = middleware(true, Some(decision));
        assert_eq!(mw.authorize(&SecurityContext::new("req-3")), Action::Proceed);
    }

    #[test]
    fn blocked_user() {
        let mw = middleware(true, Some(BlockDecision::blocked_user()));
        let response = short_circuit(mw.authorize(&SecurityContext::new("req-4")));

        assert_eq!(response.status, 403);
        assert_eq!(response.body, "Your user is blocked!");
    }

    #[test]
    fn blocked_ip() {
        let mw = middleware(true, Some(BlockDecision::blocked_ip("1.2.3.4", "abuse")));
        let response = short_circuit(mw.authorize(&SecurityContext::new("req-5")));

        assert_eq!(response.status, 403);
        assert_eq!(response.body, "Your IP (1.2.3.4) is blocked due to: abuse!");
    }

    #[test]
    fn rate_limited_user() {
        let mw = middleware(true, Some(BlockDecision::rate_limited_user()));
        let check = mw.check(&SecurityContext::new("req-6"));

        assert_eq!(check.outcome, AuditOutcome::RateLimited);
        assert_eq!(check.trigger, Some(BlockTrigger::User));
        let response = short_circuit(check.action);
        assert_eq!(response.status, 429);
        assert_eq!(response.body, "Your user exceeded the rate limit for this endpoint!");
    }

    #[test]
    fn rate_limited_ip() {
        let mw = middleware(true, Some(BlockDecision::rate_limited_ip("10.1.1.1")));
        let response = short_circuit(mw.authorize(&SecurityContext::new("req-7")));

        assert_eq!(response.status, 429);
        assert_eq!(
            response.body,
            "Your IP (10.1.1.1) exceeded the rate limit for this endpoint!"
        );
    }

    #[test]
    fn other_kind_uses_catch_all() {
        let decision = BlockDecision::block(BlockKind::Other, BlockTrigger::Unknown);
        let mw = middleware(true, Some(decision.clone()));
        let response = short_circuit(mw.authorize(&SecurityContext::new("req-8")));

        assert_eq!(response.status, 429);
        assert_eq!(response.body, format!("Blocked! {}", decision.to_json()));
    }

    #[test]
    fn known_kind_with_unknown_trigger_is_not_dropped() {
        for kind in [BlockKind::Blocked, BlockKind::RateLimited] {
            let (outcome, response) =
                block_response(&BlockDecision::block(kind, BlockTrigger::Unknown));

            assert_eq!(outcome, AuditOutcome::Unclassified);
            assert_eq!(response.status, 429);
            assert!(response.body.starts_with("Blocked! "));
        }
    }

    struct CountingEngine {
        availability_checks: AtomicUsize,
    }

    impl PolicyDecisionClient for CountingEngine {
        fn is_available(&self) -> bool {
            self.availability_checks.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn register_identity(&self, _identity: &CallerIdentity) {}

        fn evaluate_request(&self, _ctx: &SecurityContext) -> Option<BlockDecision> {
            None
        }
    }

    #[test]
    fn debug_output_does_not_query_engine() {
        let client = Arc::new(CountingEngine {
            availability_checks: AtomicUsize::new(0),
        });
        let mw = AccessControlMiddleware::new(client.clone());

        let rendered = format!("{:?}", mw);

        assert_eq!(rendered, "AccessControlMiddleware { .. }");
        assert_eq!(client.availability_checks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn ip_row_without_details_renders_empty_fields() {
        let decision = BlockDecision::block(BlockKind::Blocked, BlockTrigger::Ip);
        let (_, response) = block_response(&decision);
        assert_eq!(response.body, "Your IP () is blocked due to: !");
    }
}
