//! puz configuration
//!
//! This crate owns everything puz reads from or writes to disk:
//!
//! - [`package_use`]: the per-package USE flag store backed by package.use
//! - [`use_flags`]: USE flag tokens and the sign model
//! - [`loader`]: the TOML settings file
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use puz_config::{FlagStore, SettingsLoader};
//!
//! let settings = SettingsLoader::new().load().unwrap();
//! let mut store = FlagStore::load(&settings.use_file).unwrap();
//!
//! store.append("dev-lang/python", "-gdbm");
//! println!("{}", store.format_entry("dev-lang/python"));
//!
//! let written = store.commit().unwrap();
//! println!("New package.use file is {}", written.display());
//! ```

pub mod error;
pub mod loader;
pub mod package_use;
pub mod use_flags;

pub use error::{ConfigError, Result, StoreError};
pub use loader::{env_vars, paths, EmergeSettings, Settings, SettingsLoader};
pub use package_use::{FlagStore, COMMIT_MODE};
pub use use_flags::{bare_flag_name, strip_sign, UseFlag};
