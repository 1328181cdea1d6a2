//! Connection configuration
//!
//! ```toml
//! path = "data/app.db"      # omit for an in-memory database
//! foreign_keys = true
//! journal_mode = "wal"      # defaults to WAL for file databases
//! busy_timeout_ms = 5000
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Failure loading a `DbConfig`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// SQLite journal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    Wal,
    Off,
}

impl JournalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Persist => "PERSIST",
            JournalMode::Memory => "MEMORY",
            JournalMode::Wal => "WAL",
            JournalMode::Off => "OFF",
        }
    }
}

impl FromStr for JournalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DELETE" => Ok(JournalMode::Delete),
            "TRUNCATE" => Ok(JournalMode::Truncate),
            "PERSIST" => Ok(JournalMode::Persist),
            "MEMORY" => Ok(JournalMode::Memory),
            "WAL" => Ok(JournalMode::Wal),
            "OFF" => Ok(JournalMode::Off),
            _ => Err(format!("unknown journal mode '{}'", s)),
        }
    }
}

impl TryFrom<String> for JournalMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// How to open and configure a connection
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    /// Database file; `None` opens an in-memory database
    pub path: Option<PathBuf>,
    pub foreign_keys: bool,
    /// `None` keeps SQLite's default for in-memory databases and uses WAL
    /// for files
    pub journal_mode: Option<JournalMode>,
    pub busy_timeout_ms: Option<u64>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: None,
            foreign_keys: true,
            journal_mode: None,
            busy_timeout_ms: None,
        }
    }
}

impl DbConfig {
    /// In-memory database with default settings
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// File database with default settings
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// * `Parse` - malformed TOML, an unknown key or an unknown journal mode
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// * `Read` - the file could not be read
    /// * `Parse` - see [`DbConfig::from_toml_str`]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Journal mode to apply, after defaults
    pub fn effective_journal_mode(&self) -> Option<JournalMode> {
        match (self.journal_mode, &self.path) {
            (Some(mode), _) => Some(mode),
            (None, Some(_)) => Some(JournalMode::Wal),
            (None, None) => None,
        }
    }
}
