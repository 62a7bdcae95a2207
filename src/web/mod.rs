//! Web framework integration surface.
//!
//! This module is the boundary between HTTP frameworks and the gate. It
//! handles:
//! - Mapping HTTP requests to a per-request [`SecurityContext`](crate::SecurityContext)
//! - Resolving and registering the caller identity
//! - Short-circuiting blocked requests before they reach a route handler
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: Nothing here depends on a web framework.
//!    Integrations fill a [`RequestAdapter`] or implement [`HeaderSource`] and
//!    [`ExtractSecurityContext`] on their own request type, then convert the returned
//!    [`HttpResponse`](crate::HttpResponse).
//!
//! 2. **Fail-Open**: When the policy engine is not loaded, times out, or has
//!    nothing to say, the request proceeds.
//!
//! 3. **Explicit Context**: No global state. The security context is a value
//!    threaded through each stage.
//!
//! # Integration Flow
//!
//! ```text
//! HTTP Request
//!   ↓
//! Framework-specific code builds RequestAdapter (or its own request type)
//!   ↓
//! RequestPipeline::handle(&request, handler)
//!   ├─ IdentityResolver        (user | X-User-ID + X-User-Name)
//!   ├─ AccessControlMiddleware (403 / 429 short-circuit, or proceed)
//!   └─ handler(&ctx, &request)
//!   ↓
//! HttpResponse
//! ```

mod adapter;
pub mod example_handler;
mod extract;
mod middleware;
mod pipeline;

pub use adapter::RequestAdapter;
pub use extract::{ExtractSecurityContext, HeaderSource};
pub use middleware::{block_response, AccessControlMiddleware, Action};
pub use pipeline::RequestPipeline;
