//! Settings loading utilities
//!
//! puz reads an optional TOML settings file naming the package.use file to
//! edit and the emerge command used to produce the dry-run report. Every
//! field has a default, so a missing file simply yields [`Settings::default`].

use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// package.use file to load and commit
    pub use_file: PathBuf,
    /// Dry-run invocation of the package manager
    pub emerge: EmergeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_file: paths::package_use(),
            emerge: EmergeSettings::default(),
        }
    }
}

/// How to invoke emerge for the dry-run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmergeSettings {
    /// Program to run
    pub program: String,
    /// Arguments placed before the target atom
    pub args: Vec<String>,
}

impl Default for EmergeSettings {
    fn default() -> Self {
        Self {
            program: "emerge".to_string(),
            // pretend, verbose, no dependencies
            args: vec!["-pvO".to_string()],
        }
    }
}

impl Settings {
    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.emerge.program.trim().is_empty() {
            return Err(ConfigError::Invalid("emerge.program is empty".to_string()));
        }
        if self.use_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("use_file is empty".to_string()));
        }
        Ok(())
    }
}

/// Settings loader
///
/// With an explicit path the file must exist. Otherwise the per-user file
/// and then the system file are tried, falling back to defaults.
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    explicit: Option<PathBuf>,
}

impl SettingsLoader {
    /// Create a loader that searches the default locations
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader for one specific file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit: Some(path.into()),
        }
    }

    /// Files that would be consulted, in order
    pub fn candidates(&self) -> Vec<PathBuf> {
        match &self.explicit {
            Some(path) => vec![path.clone()],
            None => paths::user_settings()
                .into_iter()
                .chain(std::iter::once(paths::system_settings()))
                .collect(),
        }
    }

    /// Load the settings
    pub fn load(&self) -> Result<Settings> {
        if let Some(path) = &self.explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.clone()));
            }
            debug!("Loading settings from {}", path.display());
            return Settings::load_from(path);
        }

        for path in self.candidates() {
            if path.exists() {
                debug!("Loading settings from {}", path.display());
                return Settings::load_from(&path);
            }
        }

        debug!("No settings file found, using defaults");
        Ok(Settings::default())
    }
}

/// Default paths
pub mod paths {
    use std::path::PathBuf;

    /// Portage configuration root, honouring PORTAGE_CONFIGROOT
    pub fn config_root() -> PathBuf {
        std::env::var(super::env_vars::PORTAGE_CONFIGROOT)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/"))
    }

    /// package.use file
    pub fn package_use() -> PathBuf {
        config_root().join("etc/portage/package.use")
    }

    /// System settings file
    pub fn system_settings() -> PathBuf {
        PathBuf::from("/etc/puz.toml")
    }

    /// Per-user settings file
    pub fn user_settings() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("puz").join("config.toml"))
    }
}

/// Environment variable names read by puz
pub mod env_vars {
    /// Settings file override
    pub const CONFIG: &str = "PUZ_CONFIG";
    /// Portage compatibility variable
    pub const PORTAGE_CONFIGROOT: &str = "PORTAGE_CONFIGROOT";
}
