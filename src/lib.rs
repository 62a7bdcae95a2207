//! Identity resolution and fail-open access control for RASP-protected services.
//!
//! Every request runs through a short, strictly ordered pipeline before its
//! route handler:
//! - **Identity**: a caller identity is derived from the `user` header or the
//!   `X-User-ID` / `X-User-Name` pair and registered with the policy engine
//! - **Access control**: the engine's blocking decision either short-circuits
//!   the request with a 403/429 response or lets it through
//! - **Fail-open**: an engine that is not loaded, slow, or silent never blocks
//!
//! # Core Types
//!
//! - [`PolicyDecisionClient`]: seam to the external policy engine
//! - [`SecurityContext`]: per-request state threaded through the pipeline
//! - [`IdentityResolver`] / [`CallerIdentity`]: header-derived caller identity
//! - [`BlockDecision`]: the engine's answer
//! - [`web::RequestPipeline`]: identity, then access control, then handler
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use request_gate::web::{example_handler, RequestAdapter, RequestPipeline};
//! use request_gate::{
//!     BlockDecision, CallerIdentity, GateConfig, PolicyDecisionClient, SecurityContext,
//! };
//!
//! struct BlockEveryone;
//!
//! impl PolicyDecisionClient for BlockEveryone {
//!     fn is_available(&self) -> bool {
//!         true
//!     }
//!     fn register_identity(&self, _identity: &CallerIdentity) {}
//!     fn evaluate_request(&self, _ctx: &SecurityContext) -> Option<BlockDecision> {
//!         Some(BlockDecision::blocked_user())
//!     }
//! }
//!
//! let pipeline = RequestPipeline::from_config(Arc::new(BlockEveryone), &GateConfig::default());
//!
//! let mut request = RequestAdapter::new("req-123".to_string());
//! request.add_header("user".to_string(), "1".to_string());
//!
//! let response = pipeline.handle(&request, example_handler::user_blocking);
//! assert_eq!(response.status, 403);
//! assert_eq!(response.body, "Your user is blocked!");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod client;
mod config;
mod context;
mod decision;
mod error;
mod identity;
mod logging;
mod response;
pub mod web;

pub use client::{DetachedClient, PolicyDecisionClient, TimeoutClient, DEFAULT_MAX_IN_FLIGHT};
pub use config::{GateConfig, IdentityConfig, PolicyConfig, MAX_DECISION_TIMEOUT_MS};
pub use context::SecurityContext;
pub use decision::{BlockDecision, BlockKind, BlockTrigger};
pub use error::{ConfigError, Error};
pub use identity::{
    name_for_id, parse_leading_int, CallerIdentity, IdentityResolver, IdentitySource, FIXED_NAMES,
};
pub use logging::RequestLog;
pub use response::{ContentType, HttpResponse, FORBIDDEN, OK, TOO_MANY_REQUESTS};
