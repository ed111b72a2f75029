//! Engine options
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! max_depth = 64
//! max_passes = 32
//! strict_references = false
//! builtin_dir = "/usr/local/share/xcenv"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Upper bound accepted for the depth and pass limits.
const LIMIT_CEILING: usize = 1024;

/// Options controlling resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum nesting of setting references while resolving one value
    pub max_depth: usize,

    /// Maximum substitution passes over one string before giving up
    pub max_passes: usize,

    /// Treat references to unknown settings as errors instead of dropping them
    pub strict_references: bool,

    /// Directory holding `defaults.xcconfig` and `runtime.xcconfig`.
    /// When unset the embedded copies are used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub builtin_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_passes: 32,
            strict_references: false,
            builtin_dir: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_depth > LIMIT_CEILING {
            return Err(ConfigError::ValidationError(format!(
                "max_depth must be in [1, {}]",
                LIMIT_CEILING
            )));
        }

        if self.max_passes == 0 || self.max_passes > LIMIT_CEILING {
            return Err(ConfigError::ValidationError(format!(
                "max_passes must be in [1, {}]",
                LIMIT_CEILING
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
