//! Audit event schema.

use std::fmt;

use crate::decision::BlockTrigger;

/// How the access-control stage resolved for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The collaborator was consulted and let the request through
    Allowed,
    /// The collaborator was unavailable; the request proceeded unchecked
    FailOpen,
    /// Short-circuited with 403
    Blocked,
    /// Short-circuited with 429 after a rate-limit decision
    RateLimited,
    /// Short-circuited with 429 on a blocking decision with no dedicated response
    Unclassified,
}

impl AuditOutcome {
    /// Returns true if the route handler was not invoked.
    pub fn is_short_circuit(&self) -> bool {
        matches!(
            self,
            AuditOutcome::Blocked | AuditOutcome::RateLimited | AuditOutcome::Unclassified
        )
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Allowed => write!(f, "allowed"),
            AuditOutcome::FailOpen => write!(f, "fail_open"),
            AuditOutcome::Blocked => write!(f, "blocked"),
            AuditOutcome::RateLimited => write!(f, "rate_limited"),
            AuditOutcome::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// A structured audit event containing only safe metadata.
///
/// # Example
///
/// ```
/// use request_gate::audit::{AuditEvent, AuditOutcome};
/// use request_gate::BlockTrigger;
///
/// let event = AuditEvent::new("req-123", "/test_user_blocking", AuditOutcome::Blocked)
///     .with_caller_id(Some(4))
///     .with_trigger(BlockTrigger::User)
///     .with_status(403);
///
/// assert_eq!(event.request_id(), "req-123");
/// assert_eq!(event.caller_id(), Some(4));
/// assert_eq!(event.status(), Some(403));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Request identifier for correlation
    request_id: String,
    /// Request path (no query string)
    path: String,
    /// Access-control resolution
    outcome: AuditOutcome,
    /// Registered caller id, if any
    caller_id: Option<i64>,
    /// What a blocking decision was keyed on
    trigger: Option<BlockTrigger>,
    /// Status of the short-circuit response
    status: Option<u16>,
}

impl AuditEvent {
    /// Creates a new audit event with required fields.
    pub fn new(
        request_id: impl Into<String>,
        path: impl Into<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            path: path.into(),
            outcome,
            caller_id: None,
            trigger: None,
            status: None,
        }
    }

    /// Sets the registered caller id.
    pub fn with_caller_id(mut self, caller_id: Option<i64>) -> Self {
        self.caller_id = caller_id;
        self
    }

    /// Sets the decision trigger.
    pub fn with_trigger(mut self, trigger: BlockTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Sets the short-circuit status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the request identifier.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Returns the caller id, if one was registered.
    pub fn caller_id(&self) -> Option<i64> {
        self.caller_id
    }

    /// Returns the decision trigger, if the request was short-circuited.
    pub fn trigger(&self) -> Option<BlockTrigger> {
        self.trigger
    }

    /// Returns the short-circuit status, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[outcome={}, request_id={}, path={}",
            self.outcome, self.request_id, self.path
        )?;

        match self.caller_id {
            Some(id) => write!(f, ", caller_id={}", id)?,
            None => write!(f, ", caller_id=<none>")?,
        }
        if let Some(trigger) = self.trigger {
            write!(f, ", trigger={}", trigger)?;
        }
        if let Some(status) = self.status {
            write!(f, ", status={}", status)?;
        }

        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_outcome_display() {
        assert_eq!(AuditOutcome::FailOpen.to_string(), "fail_open");
        assert_eq!(AuditOutcome::RateLimited.to_string(), "rate_limited");
    }

    #[test]
    fn short_circuit_outcomes() {
        assert!(!AuditOutcome::Allowed.is_short_circuit());
        assert!(!AuditOutcome::FailOpen.is_short_circuit());
        assert!(AuditOutcome::Blocked.is_short_circuit());
        assert!(AuditOutcome::Unclassified.is_short_circuit());
    }

    #[test]
    fn audit_event_minimal() {
        let event = AuditEvent::new("req-1", "/", AuditOutcome::Allowed);

        assert_eq!(event.path(), "/");
        assert!(event.caller_id().is_none());
        assert!(event.trigger().is_none());
        assert!(event.status().is_none());
    }

    #[test]
    fn audit_event_display() {
        let event = AuditEvent::new("req-ip", "/api/pets", AuditOutcome::RateLimited)
            .with_trigger(BlockTrigger::Ip)
            .with_status(429);

        assert_eq!(
            event.to_string(),
            "AuditEvent[outcome=rate_limited, request_id=req-ip, path=/api/pets, caller_id=<none>, trigger=ip, status=429]"
        );
    }
}
