//! Flag selection commands
//!
//! At the prompt the user types options prefixed with `+` followed by the
//! flags to record, for example `+v +a udev -static-libs`. Options use `+`
//! so that `-flag` stays an ordinary disabled flag.

use crate::error::SelectionError;
use crate::report::PackageRecord;
use puz_config::FlagStore;
use tracing::debug;

/// Help text for the selection prompt
pub const HELP: &str = "\
usage: [+v] [+a] [+s] [+h] [flag ...]

options:
  +v, ++version  include version in USE flag entry
  +a, ++append   append the following flags to the current entry
  +s, ++skip     make no changes and skip this package
  +h, ++help     show this help message

examples (current entry 'x11-base/xorg-server ipv6 nptl xorg'):
  +a udev doc        x11-base/xorg-server ipv6 nptl xorg udev doc
  +v +a udev -doc    x11-base/xorg-server-1.12.2 udev -doc
  udev doc           x11-base/xorg-server udev doc
";

/// What the user asked for at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave this package alone
    Skip,
    /// Show [`HELP`] and ask again
    Help,
    /// Record flags
    Apply(Selection),
}

/// Flags to record and how to record them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Key the entry by name-version instead of bare name
    pub versioned: bool,
    /// Extend the existing entry instead of replacing it
    pub append: bool,
    /// Flags in the order typed
    pub flags: Vec<String>,
}

#[derive(Default)]
struct Options {
    versioned: bool,
    append: bool,
    skip: bool,
    help: bool,
}

impl Options {
    fn set_long(&mut self, name: &str) -> Result<(), SelectionError> {
        match name {
            "version" => self.versioned = true,
            "append" => self.append = true,
            "skip" => self.skip = true,
            "help" => self.help = true,
            _ => return Err(SelectionError::UnknownOption(format!("++{}", name))),
        }
        Ok(())
    }

    fn set_short(&mut self, option: char) -> Result<(), SelectionError> {
        match option {
            'v' => self.versioned = true,
            'a' => self.append = true,
            's' => self.skip = true,
            'h' => self.help = true,
            _ => return Err(SelectionError::UnknownOption(format!("+{}", option))),
        }
        Ok(())
    }
}

/// Parse one line typed at the prompt for `record`.
///
/// Every flag must be one the record advertises; the sign is ignored for
/// that check. Help takes precedence over everything else. Blank input is
/// rejected so an entry is only cleared by an explicit option such as `+v`.
pub fn parse_command(input: &str, record: &PackageRecord) -> Result<Command, SelectionError> {
    if input.trim().is_empty() {
        return Err(SelectionError::Empty);
    }

    let mut options = Options::default();
    let mut flags = Vec::new();

    for token in input.split_whitespace() {
        if let Some(long) = token.strip_prefix("++") {
            options.set_long(long)?;
        } else if let Some(short) = token.strip_prefix('+') {
            if short.is_empty() {
                return Err(SelectionError::UnknownOption(token.to_string()));
            }
            for option in short.chars() {
                options.set_short(option)?;
            }
        } else {
            flags.push(token.to_string());
        }
    }

    if options.help {
        return Ok(Command::Help);
    }

    if let Some(invalid) = flags.iter().find(|flag| !record.is_valid_flag(flag)) {
        return Err(SelectionError::InvalidFlag(invalid.clone()));
    }

    if options.skip {
        return Ok(Command::Skip);
    }

    Ok(Command::Apply(Selection {
        versioned: options.versioned,
        append: options.append,
        flags,
    }))
}

impl Selection {
    /// Store key this selection writes to
    pub fn key<'a>(&self, record: &'a PackageRecord) -> &'a str {
        if self.versioned {
            record.name_ver()
        } else {
            record.name()
        }
    }

    /// Record the flags in `store` and return the entry's previous flags
    pub fn apply(&self, store: &mut FlagStore, record: &PackageRecord) -> Vec<String> {
        let key = self.key(record);
        let previous = store.get(key).to_vec();

        if self.append {
            store.extend(key, &self.flags);
        } else {
            store.set(key, &self.flags);
        }

        debug!("{} -> {:?}", key, store.get(key));
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn xorg() -> PackageRecord {
        PackageRecord::new(
            "x11-base/xorg-server",
            "1.12.2",
            ["ipv6", "nptl", "xorg", "-udev", "-doc", "(-static-libs)"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    fn store() -> FlagStore {
        let mut store = FlagStore::empty("package.use");
        store.set("x11-base/xorg-server", ["ipv6", "nptl", "xorg"]);
        store
    }

    #[test]
    fn test_plain_flags() {
        let command = parse_command("udev doc", &xorg()).unwrap();
        assert_eq!(
            command,
            Command::Apply(Selection {
                versioned: false,
                append: false,
                flags: vec!["udev".to_string(), "doc".to_string()],
            })
        );
    }

    #[test]
    fn test_options() {
        let command = parse_command("+v ++append udev -static-libs", &xorg()).unwrap();
        assert_matches!(command, Command::Apply(Selection { versioned: true, append: true, .. }));

        let command = parse_command("+va udev", &xorg()).unwrap();
        assert_matches!(command, Command::Apply(Selection { versioned: true, append: true, .. }));
    }

    #[test]
    fn test_skip_and_help() {
        assert_eq!(parse_command("+s", &xorg()).unwrap(), Command::Skip);
        assert_eq!(parse_command("++skip udev", &xorg()).unwrap(), Command::Skip);
        assert_eq!(parse_command("+h", &xorg()).unwrap(), Command::Help);
        assert_eq!(parse_command("+s +h bogus", &xorg()).unwrap(), Command::Help);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            parse_command("udev bogus", &xorg()),
            Err(SelectionError::InvalidFlag("bogus".to_string()))
        );
        assert_eq!(
            parse_command("+x udev", &xorg()),
            Err(SelectionError::UnknownOption("+x".to_string()))
        );
        assert_eq!(
            parse_command("++force", &xorg()),
            Err(SelectionError::UnknownOption("++force".to_string()))
        );
        assert_eq!(
            parse_command("+", &xorg()),
            Err(SelectionError::UnknownOption("+".to_string()))
        );
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(parse_command("", &xorg()), Err(SelectionError::Empty));
        assert_eq!(parse_command("   ", &xorg()), Err(SelectionError::Empty));
    }

    #[test]
    fn test_options_without_flags() {
        let record = xorg();

        let mut appended = store();
        let Command::Apply(selection) = parse_command("+a", &record).unwrap() else {
            panic!("expected apply");
        };
        selection.apply(&mut appended, &record);
        assert_eq!(appended.get("x11-base/xorg-server"), ["ipv6", "nptl", "xorg"]);

        let mut versioned = store();
        let Command::Apply(selection) = parse_command("++version", &record).unwrap() else {
            panic!("expected apply");
        };
        selection.apply(&mut versioned, &record);
        assert_eq!(versioned.format_entry("x11-base/xorg-server-1.12.2"), "");
        assert_eq!(versioned.get("x11-base/xorg-server"), ["ipv6", "nptl", "xorg"]);
    }

    #[test]
    fn test_apply_append() {
        let mut store = store();
        let selection = Selection {
            append: true,
            flags: vec!["udev".to_string(), "doc".to_string()],
            ..Default::default()
        };

        selection.apply(&mut store, &xorg());
        assert_eq!(
            store.format_entry("x11-base/xorg-server"),
            "x11-base/xorg-server ipv6 nptl xorg udev doc"
        );
    }

    #[test]
    fn test_apply_versioned() {
        let mut store = store();
        let selection = Selection {
            versioned: true,
            append: true,
            flags: vec!["udev".to_string(), "-static-libs".to_string()],
        };

        let previous = selection.apply(&mut store, &xorg());
        assert!(previous.is_empty());
        assert_eq!(
            store.format_entry("x11-base/xorg-server"),
            "x11-base/xorg-server ipv6 nptl xorg"
        );
        assert_eq!(
            store.format_entry("x11-base/xorg-server-1.12.2"),
            "x11-base/xorg-server-1.12.2 udev -static-libs"
        );
    }

    #[test]
    fn test_apply_replace_then_revert() {
        let mut store = store();
        let selection = Selection {
            flags: vec!["udev".to_string(), "doc".to_string()],
            ..Default::default()
        };

        let previous = selection.apply(&mut store, &xorg());
        assert_eq!(store.get("x11-base/xorg-server"), ["udev", "doc"]);

        store.set("x11-base/xorg-server", &previous);
        assert_eq!(store.get("x11-base/xorg-server"), ["ipv6", "nptl", "xorg"]);
    }
}
