//! Error types for report parsing, emerge invocation and flag selection

use thiserror::Error;

/// A report entry line that could not be turned into a package record.
///
/// Recoverable: the caller reports it and skips that package.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed ebuild line ({line}) - no package name")]
    MissingPackage { line: String },

    #[error("Malformed ebuild line ({line}) - unmatched USE delimiter")]
    UnterminatedUse { line: String },
}

impl ParseError {
    /// The offending report line
    pub fn line(&self) -> &str {
        match self {
            Self::MissingPackage { line } | Self::UnterminatedUse { line } => line,
        }
    }
}

/// emerge found nothing to satisfy the requested target.
///
/// Aborts the whole report and carries the raw output for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No matching ebuilds!\nOutput from emerge:\n{output}")]
pub struct NoMatchError {
    /// Full emerge output
    pub output: String,
}

impl NoMatchError {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

/// Failures running the package manager
#[derive(Error, Debug)]
pub enum EmergeError {
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run '{command}' ({status})")]
    Failed {
        command: String,
        status: String,
        output: String,
    },
}

/// Invalid input at the flag selection prompt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no USE flags or options given")]
    Empty,

    #[error("{0} is not a valid option")]
    UnknownOption(String),

    #[error("{0} is not a valid USE flag")]
    InvalidFlag(String),
}
