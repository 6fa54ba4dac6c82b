//! Running emerge in pretend mode

use crate::error::EmergeError;
use crate::report::contains_no_match;
use puz_config::EmergeSettings;
use std::process::Command;
use tracing::{debug, info};

/// A configured emerge invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emerge {
    program: String,
    args: Vec<String>,
}

impl Emerge {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_settings(settings: &EmergeSettings) -> Self {
        Self::new(settings.program.clone(), settings.args.iter().cloned())
    }

    /// Command line as it would be typed, for messages
    pub fn command_line(&self, target: &str) -> String {
        let mut parts = vec![self.program.as_str()];
        parts.extend(self.args.iter().map(String::as_str));
        parts.push(target);
        parts.join(" ")
    }

    /// Run the dry run for `target` and return stdout followed by stderr.
    ///
    /// emerge exits non-zero when nothing matches the target; that output is
    /// still returned so the report parser can surface the no-match case.
    pub fn pretend(&self, target: &str) -> Result<String, EmergeError> {
        let command = self.command_line(target);
        info!("Running {}", command);

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(target)
            .output()
            .map_err(|source| EmergeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() || contains_no_match(&text) {
            debug!("emerge produced {} lines", text.lines().count());
            return Ok(text);
        }

        Err(EmergeError::Failed {
            command,
            status: output.status.to_string(),
            output: text,
        })
    }
}

impl Default for Emerge {
    fn default() -> Self {
        Self::from_settings(&EmergeSettings::default())
    }
}
