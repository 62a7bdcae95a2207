//! Route handlers for the demo endpoints exercised by the RASP test harness.
//!
//! Each handler has the signature [`RequestPipeline::handle`] expects, so it
//! only runs once identity resolution and access control let the request
//! through. Handlers accept any request type that exposes its headers.
//!
//! [`RequestPipeline::handle`]: super::RequestPipeline::handle

use crate::context::SecurityContext;
use crate::response::HttpResponse;

use super::HeaderSource;

/// `GET /test_ratelimiting_1`
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use request_gate::web::{example_handler::ratelimiting_1, RequestAdapter, RequestPipeline};
/// use request_gate::DetachedClient;
///
/// let pipeline = RequestPipeline::new(Arc::new(DetachedClient));
/// let response = pipeline.handle(&RequestAdapter::new("req-rl".to_string()), ratelimiting_1);
/// assert_eq!(response.body, "Request successful (Ratelimiting 1)");
/// ```
pub fn ratelimiting_1<R: HeaderSource + ?Sized>(
    _ctx: &SecurityContext,
    _request: &R,
) -> HttpResponse {
    HttpResponse::ok("Request successful (Ratelimiting 1)")
}

/// `GET /test_ratelimiting_2`
pub fn ratelimiting_2<R: HeaderSource + ?Sized>(
    _ctx: &SecurityContext,
    _request: &R,
) -> HttpResponse {
    HttpResponse::ok("Request successful (Ratelimiting 2)")
}

/// `GET /test_bot_blocking`
pub fn bot_blocking<R: HeaderSource + ?Sized>(
    _ctx: &SecurityContext,
    _request: &R,
) -> HttpResponse {
    HttpResponse::ok("Hello World! Bot blocking enabled on this route.")
}

/// `GET /test_user_blocking`
///
/// Echoes the raw `user` header, not the resolved identity.
pub fn user_blocking<R: HeaderSource + ?Sized>(
    _ctx: &SecurityContext,
    request: &R,
) -> HttpResponse {
    let user = request.header("user").unwrap_or_default();
    HttpResponse::ok(format!("Hello User with id: {}", user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::RequestAdapter;
    use std::collections::HashMap;

    type Handler = fn(&SecurityContext, &RequestAdapter) -> HttpResponse;

    fn call(handler: Handler, request: &RequestAdapter) -> HttpResponse {
        handler(&SecurityContext::new(request.request_id()), request)
    }

    #[test]
    fn static_routes_return_fixed_bodies() {
        let request = RequestAdapter::new("req-static".to_string());

        assert_eq!(call(ratelimiting_1, &request).body, "Request successful (Ratelimiting 1)");
        assert_eq!(call(ratelimiting_2, &request).body, "Request successful (Ratelimiting 2)");
        assert_eq!(
            call(bot_blocking, &request).body,
            "Hello World! Bot blocking enabled on this route."
        );
    }

    #[test]
    fn user_blocking_echoes_raw_header() {
        let mut request = RequestAdapter::new("req-user".to_string());
        request.add_header("user".to_string(), "007abc".to_string());

        let response = call(user_blocking, &request);

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "Hello User with id: 007abc");
    }

    #[test]
    fn user_blocking_without_header() {
        let request = RequestAdapter::new("req-anon".to_string());
        assert_eq!(call(user_blocking, &request).body, "Hello User with id: ");
    }

    #[test]
    fn user_blocking_reads_any_header_source() {
        let mut headers = HashMap::new();
        headers.insert("User".to_string(), "12".to_string());

        let response = user_blocking(&SecurityContext::new("req-map"), &headers);
        assert_eq!(response.body, "Hello User with id: 12");
    }
}
