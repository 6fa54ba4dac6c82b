//! Per-package USE flag store (package.use)
//!
//! The store maps a package key, either a bare `category/name` or an exact
//! `category/name-version`, to an ordered list of flag tokens. It is loaded
//! once from the backing file and re-serialized as a whole on commit.
//!
//! For any key a flag's base name appears at most once: enabling a flag
//! replaces its disabled form in place and vice versa.

use crate::error::StoreError;
use crate::use_flags::{strip_sign, UseFlag};
use indexmap::IndexMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File mode applied to committed files (rw-r--r--)
pub const COMMIT_MODE: u32 = 0o644;

/// Suffix of files produced by [`FlagStore::commit`]
const COMMIT_SUFFIX: &str = ".puz";

/// In-memory view of a package.use file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagStore {
    /// Backing file the store was loaded from
    path: PathBuf,
    /// Flag lists in insertion order
    entries: IndexMap<String, Vec<String>>,
}

impl FlagStore {
    /// Create a store with no entries bound to `path`
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: IndexMap::new(),
        }
    }

    /// Load a store from a package.use file.
    ///
    /// A missing or unreadable file is a [`StoreError::Read`]; it is never
    /// treated as an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let content =
            std::fs::read_to_string(&path).map_err(|e| StoreError::read(&path, e))?;

        let mut store = Self::empty(path);
        store.parse_entries(&content);

        debug!(
            "Loaded {} package.use entries from {}",
            store.entries.len(),
            store.path.display()
        );
        Ok(store)
    }

    fn parse_entries(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(key) = parts.next() else {
                continue;
            };
            let flags: Vec<&str> = parts.collect();
            if flags.is_empty() {
                debug!("Skipping package.use line without flags: {}", line);
                continue;
            }

            self.set(key, flags);
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flags recorded for `key`, empty if there is no entry
    pub fn get(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the flag list for `key`
    pub fn set<I, S>(&mut self, key: &str, flags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = self.entries.entry(key.to_string()).or_default();
        list.clear();
        for flag in flags {
            merge_flag(list, flag.as_ref());
        }
    }

    /// Add one flag to `key`.
    ///
    /// A flag already present with the same sign is a no-op. If the opposite
    /// sign is present it is replaced in place.
    pub fn append(&mut self, key: &str, flag: &str) {
        let list = self.entries.entry(key.to_string()).or_default();
        merge_flag(list, flag);
    }

    /// Apply [`append`](Self::append) for each flag in order
    pub fn extend<I, S>(&mut self, key: &str, flags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = self.entries.entry(key.to_string()).or_default();
        for flag in flags {
            merge_flag(list, flag.as_ref());
        }
    }

    /// The package.use line for `key`, or `""` if it has no flags
    pub fn format_entry(&self, key: &str) -> String {
        let flags = self.get(key);
        if flags.is_empty() {
            return String::new();
        }
        format!("{} {}", key, flags.join(" "))
    }

    /// Keys that currently hold at least one flag, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, flags)| !flags.is_empty())
            .map(|(key, _)| key.as_str())
    }

    /// Number of keys holding at least one flag
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialized file contents, one line per non-empty key
    pub fn contents(&self) -> String {
        let mut out = String::new();
        for key in self.keys() {
            out.push_str(&self.format_entry(key));
            out.push('\n');
        }
        out
    }

    /// Write the store to a new file next to the backing file.
    ///
    /// The backing file itself is left untouched. Returns the path of the
    /// file that was created.
    pub fn commit(&self) -> Result<PathBuf, StoreError> {
        let dir = self.parent_dir();
        let prefix = format!("{}.", self.file_name());

        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(COMMIT_SUFFIX)
            .tempfile_in(&dir)
            .map_err(|e| StoreError::write(&dir, e))?;

        let tmp_path = file.path().to_path_buf();
        self.write_to(file.as_file_mut(), &tmp_path)?;

        let (_, path) = file.keep().map_err(|e| StoreError::write(&tmp_path, e))?;
        set_commit_mode(&path)?;

        info!("Wrote {} package.use entries to {}", self.len(), path.display());
        Ok(path)
    }

    /// Write the store to `dest`, replacing it once the new content is
    /// complete.
    pub fn commit_to(&self, dest: &Path) -> Result<PathBuf, StoreError> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut file = tempfile::Builder::new()
            .prefix(".puz")
            .tempfile_in(&dir)
            .map_err(|e| StoreError::write(dest, e))?;

        self.write_to(file.as_file_mut(), dest)?;
        set_commit_mode(file.path())?;
        file.persist(dest).map_err(|e| StoreError::write(dest, e))?;

        info!("Wrote {} package.use entries to {}", self.len(), dest.display());
        Ok(dest.to_path_buf())
    }

    fn write_to(&self, file: &mut std::fs::File, reported: &Path) -> Result<(), StoreError> {
        file.write_all(self.contents().as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| StoreError::write(reported, e))
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "package.use".to_string())
    }
}

/// Insert `flag` into `list` keeping one entry per base name
fn merge_flag(list: &mut Vec<String>, flag: &str) {
    let flag = flag.trim();
    let name = strip_sign(flag);
    if name.is_empty() || name.starts_with('-') {
        debug!("Ignoring malformed USE flag token: {:?}", flag);
        return;
    }

    if list.iter().any(|existing| existing == flag) {
        return;
    }

    let opposite = UseFlag::parse(flag).negated().to_string();
    match list.iter().position(|existing| *existing == opposite) {
        Some(pos) => list[pos] = flag.to_string(),
        None => list.push(flag.to_string()),
    }
}

#[cfg(unix)]
fn set_commit_mode(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(COMMIT_MODE))
        .map_err(|e| StoreError::write(path, e))
}

#[cfg(not(unix))]
fn set_commit_mode(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}
