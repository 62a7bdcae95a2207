//! Gate configuration, read from TOML.
//!
//! ```toml
//! [policy]
//! decision_timeout_ms = 25
//! max_in_flight_decisions = 64
//!
//! [identity]
//! user_header = "user"
//! id_header = "X-User-ID"
//! name_header = "X-User-Name"
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Upper bound accepted for `policy.decision_timeout_ms`.
pub const MAX_DECISION_TIMEOUT_MS: u64 = 1000;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Policy collaborator settings
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Identity header names
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Policy collaborator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Maximum time a decision may take, in milliseconds. `0` disables the bound.
    #[serde(default = "defaults::decision_timeout_ms")]
    pub decision_timeout_ms: u64,
    /// Cap on decision workers alive at once, hung ones included
    #[serde(default = "defaults::max_in_flight_decisions")]
    pub max_in_flight_decisions: usize,
}

impl PolicyConfig {
    /// Returns the decision bound, or `None` when disabled.
    pub fn decision_timeout(&self) -> Option<Duration> {
        match self.decision_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            decision_timeout_ms: defaults::decision_timeout_ms(),
            max_in_flight_decisions: defaults::max_in_flight_decisions(),
        }
    }
}

/// Names of the headers the identity resolver reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Single numeric id header
    #[serde(default = "defaults::user_header")]
    pub user_header: String,
    /// Id half of the header pair
    #[serde(default = "defaults::id_header")]
    pub id_header: String,
    /// Name half of the header pair
    #[serde(default = "defaults::name_header")]
    pub name_header: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_header: defaults::user_header(),
            id_header: defaults::id_header(),
            name_header: defaults::name_header(),
        }
    }
}

mod defaults {
    pub fn decision_timeout_ms() -> u64 {
        25
    }

    pub fn max_in_flight_decisions() -> usize {
        crate::client::DEFAULT_MAX_IN_FLIGHT
    }

    pub fn user_header() -> String {
        "user".to_string()
    }

    pub fn id_header() -> String {
        "X-User-ID".to_string()
    }

    pub fn name_header() -> String {
        "X-User-Name".to_string()
    }
}

impl GateConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// [`ConfigError::Invalid`] when a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_gate::GateConfig;
    ///
    /// let config = GateConfig::from_toml_str("[policy]\ndecision_timeout_ms = 40\n").unwrap();
    /// assert_eq!(config.policy.decision_timeout_ms, 40);
    /// assert_eq!(config.identity.user_header, "user");
    /// ```
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: GateConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading gate config");

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&raw)
    }

    /// Checks value constraints not expressible in the schema.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.policy.decision_timeout_ms > MAX_DECISION_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "policy.decision_timeout_ms must not exceed {}",
                MAX_DECISION_TIMEOUT_MS
            )));
        }
        if self.policy.max_in_flight_decisions == 0 {
            return Err(ConfigError::Invalid(
                "policy.max_in_flight_decisions must be at least 1".to_string(),
            ));
        }

        let headers = [
            ("identity.user_header", &self.identity.user_header),
            ("identity.id_header", &self.identity.id_header),
            ("identity.name_header", &self.identity.name_header),
        ];
        for (key, value) in headers {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
            }
        }

        Ok(())
    }
}
