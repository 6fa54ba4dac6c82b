//! puz package handling
//!
//! Turns an `emerge -pv` dry run into package records and applies the
//! user's flag selections to a [`puz_config::FlagStore`].
//!
//! - **Emerge**: runs the package manager in pretend mode
//! - **Report**: parses entry lines into [`PackageRecord`]s
//! - **Selection**: parses prompt input and records it in the store

pub mod atom;
pub mod emerge;
pub mod error;
pub mod report;
pub mod selection;

pub use emerge::Emerge;
pub use error::{EmergeError, NoMatchError, ParseError, SelectionError};
pub use report::{parse_line, parse_report, PackageRecord, ReportEntry};
pub use selection::{parse_command, Command, Selection};
