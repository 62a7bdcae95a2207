//! Extraction boundary traits for web integration.
//!
//! These traits let framework-specific request types feed
//! [`RequestPipeline::handle`](super::RequestPipeline::handle) directly,
//! without going through [`RequestAdapter`](super::RequestAdapter).

use std::collections::HashMap;

use crate::context::SecurityContext;

/// Read access to request headers.
///
/// Lookups must treat header names case-insensitively, as HTTP does.
///
/// # Examples
///
/// ```
/// use request_gate::web::HeaderSource;
/// use request_gate::IdentityResolver;
///
/// // Example framework-specific implementation
/// struct MyFrameworkRequest {
///     headers: Vec<(String, String)>,
/// }
///
/// impl HeaderSource for MyFrameworkRequest {
///     fn header(&self, name: &str) -> Option<&str> {
///         self.headers
///             .iter()
///             .find(|(k, _)| k.eq_ignore_ascii_case(name))
///             .map(|(_, v)| v.as_str())
///     }
/// }
///
/// let req = MyFrameworkRequest { headers: vec![("User".into(), "6".into())] };
/// let identity = IdentityResolver::default().resolve(&req).unwrap();
/// assert_eq!(identity.name, "Wout");
/// ```
pub trait HeaderSource {
    /// Returns the value of the named header, if present.
    fn header(&self, name: &str) -> Option<&str>;
}

/// Builds the per-request [`SecurityContext`] from a framework request.
///
/// Implementations fill in request metadata only. They must not register an
/// identity; that is the identity resolver's job.
pub trait ExtractSecurityContext {
    /// Creates a fresh context for this request.
    fn security_context(&self) -> SecurityContext;
}

impl HeaderSource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.get(name) {
            return Some(value.as_str());
        }
        self.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
