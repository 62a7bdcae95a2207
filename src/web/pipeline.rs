//! The ordered request pipeline: identity, then access control, then handler.

use std::sync::Arc;

use crate::audit::{AuditEvent, AuditTrail};
use crate::client::{PolicyDecisionClient, TimeoutClient};
use crate::config::GateConfig;
use crate::context::SecurityContext;
use crate::identity::IdentityResolver;
use crate::response::HttpResponse;

use super::middleware::{AccessControlMiddleware, Action, Check};
use super::{ExtractSecurityContext, HeaderSource};

/// Runs every request through identity resolution and access control before
/// its route handler.
///
/// A single request is a single, strictly sequential pass:
/// 1. build a fresh [`SecurityContext`] from the request
/// 2. resolve the caller identity and register it (if any)
/// 3. ask the access-control middleware for an [`Action`]
/// 4. return the short-circuit response, or call the handler
///
/// The pipeline holds no per-request state and can be shared between threads.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use request_gate::web::{RequestAdapter, RequestPipeline};
/// use request_gate::{DetachedClient, HttpResponse};
///
/// let pipeline = RequestPipeline::new(Arc::new(DetachedClient));
///
/// let mut request = RequestAdapter::new("req-1".to_string());
/// request.add_header("user".to_string(), "2".to_string());
///
/// let response = pipeline.handle(&request, |ctx, _request| {
///     let name = ctx.identity().map(|i| i.name.as_str()).unwrap_or("anonymous");
///     HttpResponse::ok(format!("hello {}", name))
/// });
///
/// assert_eq!(response.body, "hello Samuel");
/// ```
#[derive(Clone)]
pub struct RequestPipeline {
    client: Arc<dyn PolicyDecisionClient>,
    resolver: IdentityResolver,
    access: AccessControlMiddleware,
    audit: Option<Arc<AuditTrail>>,
}

impl RequestPipeline {
    /// Creates a pipeline with default identity headers and no decision bound.
    pub fn new(client: Arc<dyn PolicyDecisionClient>) -> Self {
        Self::with_resolver(client, IdentityResolver::default())
    }

    /// Creates a pipeline from configuration.
    ///
    /// The collaborator is wrapped in a [`TimeoutClient`] capped at
    /// `policy.max_in_flight_decisions` workers, unless the configured
    /// decision timeout is zero.
    pub fn from_config(client: Arc<dyn PolicyDecisionClient>, config: &GateConfig) -> Self {
        let client: Arc<dyn PolicyDecisionClient> = match config.policy.decision_timeout() {
            Some(timeout) => Arc::new(
                TimeoutClient::new(client, timeout)
                    .with_max_in_flight(config.policy.max_in_flight_decisions),
            ),
            None => client,
        };

        Self::with_resolver(client, IdentityResolver::new(config.identity.clone()))
    }

    fn with_resolver(client: Arc<dyn PolicyDecisionClient>, resolver: IdentityResolver) -> Self {
        Self {
            access: AccessControlMiddleware::new(Arc::clone(&client)),
            client,
            resolver,
            audit: None,
        }
    }

    /// Records one [`AuditEvent`] per handled request into `trail`.
    pub fn with_audit(mut self, trail: Arc<AuditTrail>) -> Self {
        self.audit = Some(trail);
        self
    }

    /// Runs the pipeline for one request.
    ///
    /// `request` is usually a [`RequestAdapter`](super::RequestAdapter), but
    /// any type exposing its headers and request metadata works. `handler` is
    /// invoked only if access control lets the request through, and receives
    /// the identity-enriched context.
    pub fn handle<R, F>(&self, request: &R, handler: F) -> HttpResponse
    where
        R: HeaderSource + ExtractSecurityContext + ?Sized,
        F: FnOnce(&SecurityContext, &R) -> HttpResponse,
    {
        let mut ctx = request.security_context();

        // Identity must be registered before the decision is requested
        self.resolver
            .resolve_and_register(request, &mut ctx, self.client.as_ref());

        let check = self.access.check(&ctx);
        self.record(&ctx, &check);

        match check.action {
            Action::ShortCircuit(response) => response,
            Action::Proceed => handler(&ctx, request),
        }
    }

    fn record(&self, ctx: &SecurityContext, check: &Check) {
        let Some(trail) = &self.audit else {
            return;
        };

        let mut event = AuditEvent::new(ctx.request_id(), ctx.path(), check.outcome)
            .with_caller_id(ctx.identity().map(|identity| identity.id));
        if let Some(trigger) = check.trigger {
            event = event.with_trigger(trigger);
        }
        if let Action::ShortCircuit(response) = &check.action {
            event = event.with_status(response.status);
        }

        trail.record(event);
    }
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("resolver", &self.resolver)
            .field("access", &self.access)
            .field("audit", &self.audit.is_some())
            .finish()
    }
}
