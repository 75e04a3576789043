//! # Error Types
//!
//! The index operations are total and never fail, so errors only arise at
//! the edges: loading configuration and replaying update scripts. All
//! errors use `thiserror` for derive-based `Display` and `Error`.

use thiserror::Error;

/// Top-level error type for memberset drivers.
#[derive(Error, Debug)]
pub enum MembersetError {
    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An update script line could not be applied.
    #[error("replay error at line {line}: {message}")]
    Replay {
        /// 1-based line number in the script.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error in pipeline configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid YAML or does not match the schema.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// The document parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
