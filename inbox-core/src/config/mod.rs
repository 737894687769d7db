//! # Configuration
//!
//! Inbox settings resolved from defaults, an optional TOML, YAML or JSON file,
//! and `INBOX_*` environment variables.

use serde::{Deserialize, Serialize};
use std::{env, fmt, fs, path::Path, str::FromStr};
use thiserror::Error;
use tracing::level_filters::LevelFilter;

#[cfg(test)]
mod integration_tests;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for [`Config`].
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// The file is not valid YAML for [`Config`].
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yml::Error),
    /// The file is not valid JSON for [`Config`].
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// Extension or format name other than toml, yaml, yml or json.
    #[error("unsupported configuration format '{0}'. Use 'toml', 'yaml' or 'json'.")]
    UnsupportedFormat(String),
    /// An `INBOX_*` variable held an unparsable value.
    #[error("invalid {var} value '{value}'")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
    /// Every problem reported by [`Config::validate`].
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain text lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive, e.g. `info` or `debug`.
    pub level: String,
    /// Human readable text or JSON lines.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Dedup guard retention settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Release keys below a conversation's watermark once it advances.
    pub compact_below_watermark: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            compact_below_watermark: true,
        }
    }
}

/// The main configuration structure for the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Assignees whose conversations are hidden from the read view.
    pub blocked_assignees: Vec<String>,

    /// Dedup retention.
    pub dedup: DedupConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Config {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            blocked_assignees: Vec::new(),
            dedup: DedupConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// File values win over environment variables, which win over defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, an `INBOX_*`
    /// variable cannot be parsed, or the resolved configuration is invalid.
    pub fn load_config(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::with_defaults(),
        };
        config.apply_env_overrides()?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Parses a configuration file, picking the format from its extension.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, has an unknown extension,
    /// or fails to parse.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("yaml" | "yml") => Ok(serde_yml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Serializes the configuration in `format` (`toml`, `yaml` or `json`).
    ///
    /// # Errors
    /// Returns an error for an unknown format or a serializer failure.
    pub fn render(&self, format: &str) -> Result<String, ConfigError> {
        match format {
            "toml" => toml::to_string_pretty(self)
                .map_err(|err| ConfigError::Invalid(vec![err.to_string()])),
            "yaml" => Ok(serde_yml::to_string(self)?),
            "json" => Ok(serde_json::to_string_pretty(self)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let defaults = Self::with_defaults();

        if self.blocked_assignees == defaults.blocked_assignees
            && let Ok(users) = env::var("INBOX_BLOCKED_ASSIGNEES")
        {
            self.blocked_assignees = users
                .split(',')
                .map(str::trim)
                .filter(|user| !user.is_empty())
                .map(str::to_string)
                .collect();
        }
        if self.logging.level == defaults.logging.level
            && let Ok(level) = env::var("INBOX_LOG_LEVEL")
        {
            self.logging.level = level;
        }
        if self.logging.format == defaults.logging.format
            && let Ok(format) = env::var("INBOX_LOG_FORMAT")
        {
            self.logging.format = format.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "INBOX_LOG_FORMAT",
                value: format,
            })?;
        }
        if self.dedup == defaults.dedup
            && let Ok(compact) = env::var("INBOX_DEDUP_COMPACTION")
        {
            self.dedup.compact_below_watermark =
                compact.parse().map_err(|_| ConfigError::InvalidEnv {
                    var: "INBOX_DEDUP_COMPACTION",
                    value: compact,
                })?;
        }
        Ok(())
    }

    /// Validates the complete configuration, collecting every problem found.
    ///
    /// # Errors
    /// Returns the list of problems when at least one is found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self
            .blocked_assignees
            .iter()
            .any(|user| user.trim().is_empty())
        {
            errors.push("Blocked assignees must not be blank.".to_string());
        }

        if self.logging.level.parse::<LevelFilter>().is_err() {
            errors.push(format!("Invalid log level: {}", self.logging.level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
