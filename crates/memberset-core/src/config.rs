//! # Pipeline Configuration
//!
//! YAML-backed settings for drivers that wire the tag index into the
//! IP-set calculator. Every field has a default, so an empty document is a
//! valid configuration.
//!
//! ```yaml
//! ip_set_prefix: "tag-"
//! log_filter: "memberset=debug"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MembersetError};

/// Settings for a tag-to-IP-set pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Prepended to a tag to form the IP-set identifier. Empty means the
    /// IP set is named exactly after the tag.
    pub ip_set_prefix: String,
    /// `tracing` filter directive used when no verbosity flag is given.
    pub log_filter: Option<String>,
}

impl PipelineConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: &Path) -> Result<Self, MembersetError> {
        let yaml = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml_str(&yaml)?)
    }

    /// Reject values that cannot name an IP set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ip_set_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "ip_set_prefix must not contain whitespace: {:?}",
                self.ip_set_prefix
            )));
        }
        if let Some(filter) = &self.log_filter {
            if filter.trim().is_empty() {
                return Err(ConfigError::Invalid("log_filter must not be blank".into()));
            }
        }
        Ok(())
    }
}
