//! Application configuration.
//!
//! The configuration is loaded from
//! `$XDG_CONFIG_HOME/wf-inactive-alpha/config.json` when it exists.  The
//! socket address is never configured here: it always comes from
//! `$WAYFIRE_SOCKET`.
//!
//! # Example
//!
//! ```json
//! {
//!   "alpha": {
//!     "inactive": 0.8,
//!     "active": 1.0
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional. A minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Opacity values applied on focus changes.
    #[serde(default)]
    pub alpha: AlphaConfig,
}

/// Opacity values applied on focus changes, each in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaConfig {
    /// Applied to the previously focused toplevel when focus moves to
    /// another toplevel.
    pub inactive: f64,
    /// Applied to the newly focused toplevel.
    pub active: f64,
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            inactive: 0.8,
            active: 1.0,
        }
    }
}

impl AlphaConfig {
    /// Check that both values are usable opacities.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("inactive", self.inactive), ("active", self.active)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError(format!(
                    "alpha.{} must be within [0.0, 1.0], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&contents)
            .map_err(|e| ConfigError(format!("{}: {}", path.display(), e.0)))
    }

    /// Parse and validate configuration from a JSON string.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| ConfigError(format!("failed to parse: {}", e)))?;
        config.alpha.validate()?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
