//! Request adapter for mapping HTTP requests to gate types.

use std::collections::HashMap;

use crate::context::SecurityContext;

use super::{ExtractSecurityContext, HeaderSource};

/// Adapter for converting framework-specific HTTP requests into gate types.
///
/// `RequestAdapter` is the integration point between a web framework and the
/// request pipeline. It holds simple, owned data so that it does not couple to
/// any framework's request type; integrations fill it from their own request
/// and pass it to [`RequestPipeline::handle`](super::RequestPipeline::handle).
///
/// Header names are matched case-insensitively. Adding a header twice keeps
/// the last value.
///
/// # Examples
///
/// ```
/// use request_gate::web::{ExtractSecurityContext, HeaderSource, RequestAdapter};
///
/// let mut adapter = RequestAdapter::new("req-12345".to_string());
/// adapter.set_method("GET".to_string());
/// adapter.set_path("/test_user_blocking".to_string());
/// adapter.set_remote_addr(Some("203.0.113.7".to_string()));
/// adapter.add_header("X-User-ID".to_string(), "12".to_string());
///
/// assert_eq!(adapter.header("x-user-id"), Some("12"));
///
/// let ctx = adapter.security_context();
/// assert_eq!(ctx.request_id(), "req-12345");
/// assert_eq!(ctx.remote_ip(), Some("203.0.113.7"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    /// Unique request identifier (required)
    request_id: String,
    /// HTTP method
    method: String,
    /// Request path without query string
    path: String,
    /// Remote peer address
    remote_addr: Option<String>,
    /// Request headers, keyed by lowercase name
    headers: HashMap<String, String>,
}

impl RequestAdapter {
    /// Creates a new `GET /` request adapter with the given request ID.
    ///
    /// Use the setter methods to populate the rest.
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            method: "GET".to_string(),
            path: "/".to_string(),
            remote_addr: None,
            headers: HashMap::new(),
        }
    }

    /// Sets the HTTP method.
    pub fn set_method(&mut self, method: String) {
        self.method = method;
    }

    /// Sets the request path.
    pub fn set_path(&mut self, path: String) {
        self.path = path;
    }

    /// Sets the remote peer address.
    pub fn set_remote_addr(&mut self, addr: Option<String>) {
        self.remote_addr = addr;
    }

    /// Adds a header to the adapter.
    pub fn add_header(&mut self, key: String, value: String) {
        self.headers.insert(key.to_ascii_lowercase(), value);
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
    pub fn remote_addr(&self) -> Option<&str> {
        self.remote_addr.as_deref()
    }
}

impl HeaderSource for RequestAdapter {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

impl ExtractSecurityContext for RequestAdapter {
    fn security_context(&self) -> SecurityContext {
        let mut ctx = SecurityContext::new(self.request_id.clone())
            .with_method(self.method.clone())
            .with_path(self.path.clone());

        if let Some(addr) = &self.remote_addr {
            ctx = ctx.with_remote_ip(addr.clone());
        }
        if let Some(user_agent) = self.header("user-agent") {
            ctx = ctx.with_user_agent(user_agent);
        }

        ctx
    }
}
