//! Error types for configuration operations

use std::path::PathBuf;
use thiserror::Error;

/// Settings file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),
}

/// package.use load and commit errors
///
/// These are the only failures the flag store raises. Both carry the
/// path involved and the underlying I/O reason as text.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Could not write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn read(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Read {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
