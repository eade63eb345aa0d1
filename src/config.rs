//! Configuration for the converter
//!
//! Precedence: CLI flags > environment variables > config file > defaults.
//! The binary owns the CLI layer; this module handles the rest.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::DocumentOptions;
use crate::source::SourceOptions;

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub message: String,
    pub field: Option<String>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Config error in '{}': {}", field, self.message)
        } else {
            write!(f, "Config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

/// Input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Translate CRLF and CR line endings to LF before parsing
    pub normalize_newlines: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            normalize_newlines: true,
        }
    }
}

/// Output handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Written in place of characters Latin-1 cannot encode; unset means fail
    pub replacement: Option<char>,
    /// Append a newline when printing to standard output
    pub trailing_newline: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            replacement: None,
            trailing_newline: true,
        }
    }
}

/// Converter configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from `path`, or from the default location
    ///
    /// An explicit file must exist and parse. A broken default file is
    /// logged and skipped.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::load_from_file(&path).unwrap_or_else(|e| {
                    warn!("Failed to load config from {:?}: {}", path, e);
                    Config::default()
                }),
                _ => Config::default(),
            },
        };

        config.apply_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config file: {}", e)))
    }

    /// Apply `RTF_TEXT_*` environment variables
    pub fn apply_env_vars(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| env::var(name).ok())
    }

    fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("RTF_TEXT_NORMALIZE_NEWLINES") {
            self.input.normalize_newlines = parse_bool("RTF_TEXT_NORMALIZE_NEWLINES", &val)?;
        }
        if let Some(val) = lookup("RTF_TEXT_REPLACEMENT") {
            self.output.replacement = parse_replacement("RTF_TEXT_REPLACEMENT", &val)?;
        }
        if let Some(val) = lookup("RTF_TEXT_TRAILING_NEWLINE") {
            self.output.trailing_newline = parse_bool("RTF_TEXT_TRAILING_NEWLINE", &val)?;
        }
        Ok(())
    }

    /// Check the configuration for values the converter cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(c) = self.output.replacement {
            if u32::from(c) > 0xFF {
                return Err(ConfigError::field(
                    "output.replacement",
                    format!("Replacement {:?} is not a Latin-1 character", c),
                ));
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rtf-text").join("config.toml"))
    }

    /// Options for reading source documents
    pub fn source_options(&self) -> SourceOptions {
        SourceOptions {
            normalize_newlines: self.input.normalize_newlines,
        }
    }

    /// Options for cached documents
    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            source: self.source_options(),
            replacement: self.output.replacement,
        }
    }
}

fn parse_bool(field: &str, val: &str) -> Result<bool, ConfigError> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::field(
            field,
            format!("Expected a boolean, got '{}'", val),
        )),
    }
}

/// Parse a replacement character; an empty value clears it
pub fn parse_replacement(field: &str, val: &str) -> Result<Option<char>, ConfigError> {
    let mut chars = val.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) => Ok(Some(c)),
        _ => Err(ConfigError::field(
            field,
            format!("Expected a single character, got '{}'", val),
        )),
    }
}
