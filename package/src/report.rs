//! emerge dry-run report parsing
//!
//! `emerge -pv` prints one entry line per candidate package:
//!
//! ```text
//! [ebuild   R    ] dev-libs/libxml2-2.8.0-r2:2  USE="ipv6 (-python)" 0kB
//! ```
//!
//! Each entry line becomes a [`PackageRecord`]. A line reporting that no
//! ebuild satisfies the target aborts the whole report with a
//! [`NoMatchError`], regardless of any entries seen before it.

use crate::atom::split_name_version;
use crate::error::{NoMatchError, ParseError};
use indexmap::IndexSet;
use lazy_static::lazy_static;
use puz_config::{bare_flag_name, strip_sign};
use regex::Regex;
use tracing::{debug, trace};

lazy_static! {
    static ref ENTRY_LINE: Regex =
        Regex::new(r"^\[ebuild\s+[NSUDrRFfIBb]*\s*[~*#]*\s*\]").unwrap();
    static ref NO_MATCH_LINE: Regex =
        Regex::new(r"^emerge: there are no ebuilds to satisfy").unwrap();
}

/// Token prefix opening the active flag list
const USE_OPENER: &str = "USE=\"";

/// One package from an emerge report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    name: String,
    version: String,
    name_ver: String,
    active_flags: Vec<String>,
    available_flags: IndexSet<String>,
}

impl PackageRecord {
    /// Build a record, deriving the bare flag names from `active_flags`
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        active_flags: Vec<String>,
    ) -> Self {
        let name = name.into();
        let version = version.into();
        let name_ver = format!("{}-{}", name, version);

        let available_flags = active_flags
            .iter()
            .map(|flag| bare_flag_name(flag))
            .filter(|flag| !flag.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            name,
            version,
            name_ver,
            active_flags,
            available_flags,
        }
    }

    /// Package name (`category/name`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version including any revision and slot
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `name-version`, the key for version specific entries
    pub fn name_ver(&self) -> &str {
        &self.name_ver
    }

    /// Flags as printed in the report, markup included
    pub fn active_flags(&self) -> &[String] {
        &self.active_flags
    }

    /// Bare names of every flag the package advertises
    pub fn available_flags(&self) -> &IndexSet<String> {
        &self.available_flags
    }

    /// Whether `flag` (with or without a `-` sign) names an advertised flag
    pub fn is_valid_flag(&self, flag: &str) -> bool {
        self.available_flags.contains(strip_sign(flag.trim()))
    }
}

/// Whether `line` is a report entry line
pub fn is_entry_line(line: &str) -> bool {
    ENTRY_LINE.is_match(line)
}

/// Whether `line` reports that nothing satisfies the target
pub fn is_no_match_line(line: &str) -> bool {
    NO_MATCH_LINE.is_match(line)
}

/// Whether any line of `output` reports that nothing satisfies the target
pub fn contains_no_match(output: &str) -> bool {
    output.lines().any(is_no_match_line)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingIdentifier,
    SeekingUse,
    AccumulatingFlags,
    Done,
}

/// Parse one report entry line into a [`PackageRecord`]
pub fn parse_line(line: &str) -> Result<PackageRecord, ParseError> {
    let mut state = ScanState::SeekingIdentifier;
    let mut package: Option<(&str, &str)> = None;
    let mut flags = Vec::new();

    for token in line.split_whitespace() {
        state = match state {
            ScanState::SeekingIdentifier => match split_name_version(token) {
                Some(found) => {
                    package = Some(found);
                    ScanState::SeekingUse
                }
                None => ScanState::SeekingIdentifier,
            },
            ScanState::SeekingUse => match token.strip_prefix(USE_OPENER) {
                Some(rest) => open_flags(rest, &mut flags),
                None => ScanState::SeekingUse,
            },
            ScanState::AccumulatingFlags => accumulate_flag(token, &mut flags),
            ScanState::Done => break,
        };
    }

    let Some((name, version)) = package else {
        return Err(ParseError::MissingPackage {
            line: line.to_string(),
        });
    };

    if state == ScanState::AccumulatingFlags {
        return Err(ParseError::UnterminatedUse {
            line: line.to_string(),
        });
    }

    trace!("Parsed {}-{} with {} flags", name, version, flags.len());
    Ok(PackageRecord::new(name, version, flags))
}

/// Handle the text after `USE="`
fn open_flags(rest: &str, flags: &mut Vec<String>) -> ScanState {
    match rest.find('"') {
        Some(end) => {
            push_flag(&rest[..end], flags);
            ScanState::Done
        }
        None => {
            push_flag(rest, flags);
            ScanState::AccumulatingFlags
        }
    }
}

fn accumulate_flag(token: &str, flags: &mut Vec<String>) -> ScanState {
    match token.strip_suffix('"') {
        Some(last) => {
            push_flag(last, flags);
            ScanState::Done
        }
        None => {
            push_flag(token, flags);
            ScanState::AccumulatingFlags
        }
    }
}

fn push_flag(flag: &str, flags: &mut Vec<String>) {
    if !flag.is_empty() {
        flags.push(flag.to_string());
    }
}

/// Per-line outcome of [`parse_report`]
pub type ReportEntry = Result<PackageRecord, ParseError>;

/// Parse a full emerge report.
///
/// Lines that are not entry lines are ignored. Each entry line yields its
/// own result so one malformed line does not hide the others.
pub fn parse_report(output: &str) -> Result<Vec<ReportEntry>, NoMatchError> {
    let mut entries = Vec::new();

    for line in output.lines() {
        if is_no_match_line(line) {
            debug!("emerge reported no matching ebuilds");
            return Err(NoMatchError::new(output));
        }

        if is_entry_line(line) {
            entries.push(parse_line(line));
        }
    }

    debug!("Found {} ebuild lines in emerge output", entries.len());
    Ok(entries)
}
