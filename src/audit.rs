//! Audit trail of gate outcomes.
//!
//! This module provides:
//! - `AuditEvent`: one record per request that passed through the pipeline
//! - `AuditOutcome`: how the access-control stage resolved
//! - `AuditTrail`: in-memory, thread-safe, bounded recorder
//!
//! Events carry only safe metadata: the caller id but never the caller name,
//! which may be raw header text.

mod event;
mod trail;

pub use event::{AuditEvent, AuditOutcome};
pub use trail::{AuditTrail, DEFAULT_AUDIT_CAPACITY};
