use crate::client::PolicyDecisionClient;
use crate::identity::CallerIdentity;
use crate::logging::RequestLog;

/// Request-scoped security context handed to the policy collaborator.
///
/// `SecurityContext` replaces ambient, process-wide security state: it is
/// built once per request by the pipeline, threaded explicitly through the
/// identity resolver and the access-control middleware, and dropped when the
/// request completes.
///
/// The identity must be registered *before* a decision is requested so the
/// collaborator can take it into account.
///
/// # Examples
///
/// ```
/// use request_gate::{SecurityContext, DetachedClient, CallerIdentity, IdentitySource};
///
/// let mut ctx = SecurityContext::new("req-123")
///     .with_method("GET")
///     .with_path("/test_user_blocking")
///     .with_remote_ip("10.0.0.1");
///
/// ctx.register_identity(
///     CallerIdentity { id: 4, name: "Tudor".to_string(), source: IdentitySource::UserHeader },
///     &DetachedClient,
/// );
///
/// assert_eq!(ctx.identity().map(|i| i.id), Some(4));
/// assert_eq!(ctx.remote_ip(), Some("10.0.0.1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SecurityContext {
    request_id: String,
    method: String,
    path: String,
    remote_ip: Option<String>,
    user_agent: Option<String>,
    identity: Option<CallerIdentity>,
}

impl SecurityContext {
    /// Creates an empty context for the given request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Sets the HTTP method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Sets the request path (no query string).
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the remote peer address.
    pub fn with_remote_ip(mut self, ip: impl Into<String>) -> Self {
        self.remote_ip = Some(ip.into());
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the remote peer address, if known.
    pub fn remote_ip(&self) -> Option<&str> {
        self.remote_ip.as_deref()
    }

    /// Returns the `User-Agent` header value, if present.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Returns the registered caller identity, if any.
    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.identity.as_ref()
    }

    /// Registers the caller identity for the rest of the request.
    ///
    /// The identity is always kept on the context. It is forwarded to the
    /// collaborator only when the collaborator reports itself available;
    /// otherwise forwarding is a silent no-op.
    pub fn register_identity(
        &mut self,
        identity: CallerIdentity,
        client: &dyn PolicyDecisionClient,
    ) {
        if client.is_available() {
            client.register_identity(&identity);
        }
        self.identity = Some(identity);
    }

    /// Returns a logger bound to this request.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id)
    }
}
