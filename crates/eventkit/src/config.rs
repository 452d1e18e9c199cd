//! Dispatcher configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! delimiter = "."
//! prefix = "On"
//! on_disabled = "stop"
//! arity_policy = "disable"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::resolver::DEFAULT_DELIMITER;

/// Default prefix marking listener methods as event handlers.
pub const DEFAULT_PREFIX: &str = "On";

/// What a trigger does when it reaches a disabled callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabledPolicy {
    /// Stop the trigger; callbacks after the disabled one are not invoked.
    #[default]
    Stop,
    /// Skip the disabled callback and continue with the next one.
    Skip,
}

/// What happens when a trigger passes the wrong number of arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArityPolicy {
    /// Disable the callback and log the mismatch. The trigger succeeds.
    #[default]
    Disable,
    /// Disable the callback, log the mismatch, and report it as a failure.
    Report,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Separator between event name segments.
    pub delimiter: String,
    /// Prefix of listener methods that handle events.
    pub prefix: String,
    /// Behavior on reaching a disabled callback.
    pub on_disabled: DisabledPolicy,
    /// Behavior on an argument count mismatch.
    pub arity_policy: ArityPolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            on_disabled: DisabledPolicy::default(),
            arity_policy: ArityPolicy::default(),
        }
    }
}

impl DispatcherConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`DispatcherConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Set the name delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set the handler method prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the disabled-callback policy.
    #[must_use]
    pub fn with_disabled_policy(mut self, policy: DisabledPolicy) -> Self {
        self.on_disabled = policy;
        self
    }

    /// Set the arity-mismatch policy.
    #[must_use]
    pub fn with_arity_policy(mut self, policy: ArityPolicy) -> Self {
        self.arity_policy = policy;
        self
    }

    /// Check field values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the delimiter or prefix is empty.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.delimiter.is_empty() {
            return Err(ConfigError::Invalid("delimiter must not be empty".to_string()));
        }
        if self.prefix.is_empty() {
            return Err(ConfigError::Invalid("prefix must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DispatcherConfig::default();
        assert_eq!(config.delimiter, ".");
        assert_eq!(config.prefix, "On");
        assert_eq!(config.on_disabled, DisabledPolicy::Stop);
        assert_eq!(config.arity_policy, ArityPolicy::Disable);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = DispatcherConfig::from_toml_str("").unwrap();
        assert_eq!(config, DispatcherConfig::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let config = DispatcherConfig::from_toml_str(
            r#"
            delimiter = ":"
            prefix = "Handle"
            on_disabled = "skip"
            arity_policy = "report"
            "#,
        )
        .unwrap();

        assert_eq!(config.delimiter, ":");
        assert_eq!(config.prefix, "Handle");
        assert_eq!(config.on_disabled, DisabledPolicy::Skip);
        assert_eq!(config.arity_policy, ArityPolicy::Report);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = DispatcherConfig::from_toml_str("delimeter = \".\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let err = DispatcherConfig::from_toml_str("delimiter = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("delimiter"));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let config = DispatcherConfig::default().with_prefix("");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_builder() {
        let config = DispatcherConfig::default()
            .with_delimiter("/")
            .with_prefix("Handle")
            .with_disabled_policy(DisabledPolicy::Skip)
            .with_arity_policy(ArityPolicy::Report);

        assert_eq!(config.delimiter, "/");
        assert_eq!(config.prefix, "Handle");
        assert_eq!(config.on_disabled, DisabledPolicy::Skip);
        assert_eq!(config.arity_policy, ArityPolicy::Report);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "on_disabled = \"skip\"").unwrap();

        let config = DispatcherConfig::load(file.path()).unwrap();
        assert_eq!(config.on_disabled, DisabledPolicy::Skip);
        assert_eq!(config.delimiter, ".");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DispatcherConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
