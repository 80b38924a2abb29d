//! Authorization configuration.
//!
//! The signing secret is deliberately not part of this file format; it is
//! injected separately through [`crate::mandate::SigningSecret`].
//!
//! # Example Configuration
//!
//! ```yaml
//! global_trust_floor: 50
//! usage: repeatable   # or: single_use
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Trust floor applied to every pipeline that includes the trust-score gate.
pub const DEFAULT_GLOBAL_TRUST_FLOOR: f64 = 50.0;

/// How often a single mandate may approve a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsagePolicy {
    /// Each payment is judged on its own, up to `max_amount` per call.
    /// There is no spend ledger.
    #[default]
    Repeatable,
    /// The first approval moves the mandate to `exhausted`.
    SingleUse,
}

/// Non-secret engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthzConfig {
    /// Lower bound on the trust threshold, combined with each mandate's
    /// `min_spirit_score` by taking the maximum.
    #[serde(default = "default_global_trust_floor")]
    pub global_trust_floor: f64,

    #[serde(default)]
    pub usage: UsagePolicy,
}

fn default_global_trust_floor() -> f64 {
    DEFAULT_GLOBAL_TRUST_FLOOR
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            global_trust_floor: DEFAULT_GLOBAL_TRUST_FLOOR,
            usage: UsagePolicy::default(),
        }
    }
}

impl AuthzConfig {
    pub fn with_global_trust_floor(mut self, floor: f64) -> Self {
        self.global_trust_floor = floor;
        self
    }

    pub fn with_usage(mut self, usage: UsagePolicy) -> Self {
        self.usage = usage;
        self
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.global_trust_floor.is_finite() {
            return Err(ConfigError::Invalid {
                reason: "global_trust_floor must be a finite number".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration and secret loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {reason}")]
    Invalid { reason: String },

    #[error("signing secret not set: environment variable {var} is missing")]
    MissingSecret { var: String },

    #[error("signing secret must not be empty")]
    EmptySecret,
}
