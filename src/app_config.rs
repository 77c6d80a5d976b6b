use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::markup::MarkupOptions;
use crate::script::ScriptOptions;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Where the current script text is kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Script text reading options
    #[serde(default)]
    pub script: ScriptOptions,

    /// Markup class and tag names
    #[serde(default)]
    pub markup: MarkupOptions,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

// @const: Class and tag names must be plain identifiers
static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("Invalid identifier regex")
});

/// Storage backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    // @backend: SQLite file, persistent across runs
    #[default]
    Sqlite,
    // @backend: Process memory only
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

/// Storage configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    // @field: Backend type
    #[serde(default)]
    pub backend: StorageBackend,

    // @field: Database file; platform data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    // @field: Key holding the current script text
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_path: None,
            key: default_storage_key(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_storage_key() -> String {
    "multilogue".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(anyhow!("Storage key must not be empty"));
        }

        let names = [
            ("markup.dialogue_class", &self.markup.dialogue_class),
            ("markup.speaker_class", &self.markup.speaker_class),
            ("markup.dialogue_tag", &self.markup.dialogue_tag),
            ("markup.speaker_tag", &self.markup.speaker_tag),
        ];
        for (field, value) in names {
            if !IDENTIFIER_REGEX.is_match(value) {
                return Err(anyhow!(
                    "Invalid {}: {:?} (expected a letter followed by letters, digits, '_' or '-')",
                    field,
                    value
                ));
            }
        }

        if self.markup.dialogue_class == self.markup.speaker_class {
            return Err(anyhow!(
                "markup.dialogue_class and markup.speaker_class must differ (both are {:?})",
                self.markup.dialogue_class
            ));
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Load the configuration, writing a default one first if the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save_to_file(path)?;
        Ok(config)
    }
}
