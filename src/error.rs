use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in this crate.
///
/// The request path itself is infallible; only setup can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while loading a [`GateConfig`](crate::GateConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid TOML for this schema
    #[error("syntax error in config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration parsed but violates a constraint
    #[error("invalid config: {0}")]
    Invalid(String),
}
