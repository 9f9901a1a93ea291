//! Evaluator configuration
//!
//! Loaded from a TOML file, every key optional:
//!
//! ```toml
//! strict = false
//! pow = "exponent"        # or "legacy-divide"
//! max_call_depth = 1024
//! ```

use std::path::Path;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Meaning of `Pow` when both operands are integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowSemantics {
    /// Integer exponentiation
    #[default]
    Exponent,
    /// Truncating integer division, as the historical evaluator computed it
    LegacyDivide,
}

/// Evaluator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Treat recoverable errors as fatal
    pub strict: bool,
    pub pow: PowSemantics,
    /// Deepest allowed chain of nested calls
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            strict: false,
            pow: PowSemantics::default(),
            max_call_depth: 1024,
        }
    }
}

/// Configuration loading error
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file `{path}`")]
    #[diagnostic(code(config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config")]
    #[diagnostic(code(config::parse))]
    Parse(#[from] toml::de::Error),
}

impl EvalConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EvalConfig::from_toml_str("").unwrap();
        assert_eq!(config, EvalConfig::default());
    }

    #[test]
    fn test_parse_all_keys() {
        let config = EvalConfig::from_toml_str(
            r#"
strict = true
pow = "legacy-divide"
max_call_depth = 16
"#,
        )
        .unwrap();
        assert!(config.strict);
        assert_eq!(config.pow, PowSemantics::LegacyDivide);
        assert_eq!(config.max_call_depth, 16);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(EvalConfig::from_toml_str("fast = true").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = EvalConfig::load(Path::new("/nonexistent/fncalc.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
