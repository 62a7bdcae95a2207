//! Blocking decisions returned by the policy collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a blocking decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// The caller is blocked outright
    #[serde(rename = "blocked")]
    Blocked,
    /// The caller exceeded a rate limit
    #[serde(rename = "ratelimited", alias = "rate_limited")]
    RateLimited,
    /// Anything the collaborator reports that has no dedicated response
    #[serde(rename = "other")]
    #[serde(other)]
    Other,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Blocked => write!(f, "blocked"),
            BlockKind::RateLimited => write!(f, "ratelimited"),
            BlockKind::Other => write!(f, "other"),
        }
    }
}

/// What the decision was keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockTrigger {
    /// The registered caller identity
    #[serde(rename = "user")]
    User,
    /// The remote address
    #[serde(rename = "ip")]
    Ip,
    /// Not reported, or not recognised
    #[serde(rename = "unknown")]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for BlockTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTrigger::User => write!(f, "user"),
            BlockTrigger::Ip => write!(f, "ip"),
            BlockTrigger::Unknown => write!(f, "unknown"),
        }
    }
}

/// A per-request blocking decision.
///
/// Produced fresh for every request and consumed exactly once by the
/// access-control middleware. Serializes with the collaborator's field names
/// (`block`, `type`, `trigger`, `ip`, `description`).
///
/// # Examples
///
/// ```
/// use request_gate::{BlockDecision, BlockKind, BlockTrigger};
///
/// let decision = BlockDecision::blocked_ip("1.2.3.4", "abuse");
/// assert!(decision.should_block);
/// assert_eq!(decision.kind, BlockKind::Blocked);
/// assert_eq!(decision.trigger, BlockTrigger::Ip);
///
/// let parsed: BlockDecision =
///     serde_json::from_str(r#"{"block":true,"type":"rate_limited","trigger":"user"}"#).unwrap();
/// assert_eq!(parsed, BlockDecision::rate_limited_user());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDecision {
    /// Whether the request must be stopped
    #[serde(rename = "block")]
    pub should_block: bool,
    /// Why it is stopped
    #[serde(rename = "type", default = "default_kind")]
    pub kind: BlockKind,
    /// What the decision was keyed on
    #[serde(default = "default_trigger")]
    pub trigger: BlockTrigger,
    /// Remote address the decision applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Human-readable reason supplied by the collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_kind() -> BlockKind {
    BlockKind::Other
}

fn default_trigger() -> BlockTrigger {
    BlockTrigger::Unknown
}

impl BlockDecision {
    /// A non-blocking decision.
    pub fn allow() -> Self {
        Self {
            should_block: false,
            kind: BlockKind::Other,
            trigger: BlockTrigger::Unknown,
            ip: None,
            description: None,
        }
    }

    /// A blocking decision with the given classification and no details.
    pub fn block(kind: BlockKind, trigger: BlockTrigger) -> Self {
        Self {
            should_block: true,
            kind,
            trigger,
            ip: None,
            description: None,
        }
    }

    /// The registered user is blocked.
    pub fn blocked_user() -> Self {
        Self::block(BlockKind::Blocked, BlockTrigger::User)
    }

    /// The remote address is blocked for `description`.
    pub fn blocked_ip(ip: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            description: Some(description.into()),
            ..Self::block(BlockKind::Blocked, BlockTrigger::Ip)
        }
    }

    /// The registered user exceeded a rate limit.
    pub fn rate_limited_user() -> Self {
        Self::block(BlockKind::RateLimited, BlockTrigger::User)
    }

    /// The remote address exceeded a rate limit.
    pub fn rate_limited_ip(ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            ..Self::block(BlockKind::RateLimited, BlockTrigger::Ip)
        }
    }

    /// Serializes the decision as compact JSON.
    ///
    /// Falls back to the `Debug` rendering if serialization fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}
