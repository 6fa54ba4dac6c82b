//! USE flag tokens
//!
//! A token in package.use or in an emerge report is a flag name with an
//! optional leading `-` meaning "explicitly disabled". Emerge reports also
//! wrap masked and forced flags in `(...)` or `{...}` and mark changed flags
//! with a trailing `*` or `%`.

use std::fmt;

/// A single USE flag with enable/disable state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UseFlag {
    /// The flag name
    pub name: String,
    /// Whether the flag is enabled
    pub enabled: bool,
}

impl UseFlag {
    /// Create a new enabled USE flag
    pub fn enabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
        }
    }

    /// Create a new disabled USE flag
    pub fn disabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: false,
        }
    }

    /// Parse a USE flag string (e.g., "-gtk" or "systemd")
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.strip_prefix('-') {
            Some(name) => Self::disabled(name),
            None => Self::enabled(s),
        }
    }

    /// The same flag with the opposite sign
    pub fn negated(&self) -> Self {
        Self {
            name: self.name.clone(),
            enabled: !self.enabled,
        }
    }
}

impl fmt::Display for UseFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.enabled {
            write!(f, "-")?;
        }
        write!(f, "{}", self.name)
    }
}

/// Strip a leading `-` sign from a token
pub fn strip_sign(token: &str) -> &str {
    token.strip_prefix('-').unwrap_or(token)
}

/// Reduce a report flag token to the bare flag name.
///
/// `-doc` -> `doc`, `(-python)` -> `python`, `{-test}` -> `test`,
/// `ipv6*` -> `ipv6`. Only one layer of markup is removed.
pub fn bare_flag_name(token: &str) -> &str {
    let mut name = strip_sign(token);

    for (open, close) in [('(', ')'), ('{', '}')] {
        if let Some(inner) = name
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            name = strip_sign(inner);
            break;
        }
    }

    name.trim_end_matches(&['*', '%'][..])
}
