//! Tests for loading and committing package.use files
//!
//! Tests use temporary directories for isolation.

use assert_matches::assert_matches;
use puz_config::{FlagStore, StoreError};
use std::path::PathBuf;
use tempfile::TempDir;

const TEST_ENTRIES: &str = "\
x11-wm/xmonad doc hscolour
dev-libs/libxml2 ipv6 -python
sys-devel/gcc-4.5.4 cxx
";

/// Write `content` to a package.use file inside a fresh temp dir
fn create_use_file(content: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("package.use");
    std::fs::write(&path, content).expect("Failed to write package.use");
    (path, temp_dir)
}

fn entries(store: &FlagStore) -> Vec<(String, Vec<String>)> {
    store
        .keys()
        .map(|key| (key.to_string(), store.get(key).to_vec()))
        .collect()
}

mod load_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load() {
        let (path, _dir) = create_use_file(TEST_ENTRIES);
        let store = FlagStore::load(&path).unwrap();

        assert_eq!(store.path(), path.as_path());
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("x11-wm/xmonad"), ["doc", "hscolour"]);
        assert_eq!(store.get("dev-libs/libxml2"), ["ipv6", "-python"]);
        assert_eq!(store.get("sys-devel/gcc-4.5.4"), ["cxx"]);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.use");

        let result = FlagStore::load(&path);
        assert_matches!(result, Err(StoreError::Read { path: p, .. }) if p == path);
    }

    #[test]
    fn test_load_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let result = FlagStore::load(dir.path());
        let err = result.unwrap_err();
        assert_matches!(err, StoreError::Read { .. });
        assert!(err.to_string().starts_with("Could not read"));
    }

    #[test]
    fn test_load_then_swap_sign() {
        let (path, _dir) = create_use_file("dev-lang/python gdbm ncurses\n");
        let mut store = FlagStore::load(&path).unwrap();

        store.append("dev-lang/python", "-gdbm");
        assert_eq!(
            store.format_entry("dev-lang/python"),
            "dev-lang/python -gdbm ncurses"
        );
    }
}

mod commit_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_commit_creates_new_file() {
        let (path, dir) = create_use_file(TEST_ENTRIES);
        let mut store = FlagStore::load(&path).unwrap();

        store.set("x11-wm/xmonad-0.9.2", ["profile", "hscolour"]);
        store.set("dev-libs/libxml2", ["ipv6"]);
        store.set("sys-devel/gcc", ["cxx", "fortran"]);

        let written = store.commit().unwrap();
        assert_ne!(written, path);
        assert_eq!(written.parent(), Some(dir.path()));

        // the backing file is untouched
        assert_eq!(std::fs::read_to_string(&path).unwrap(), TEST_ENTRIES);

        let content = std::fs::read_to_string(&written).unwrap();
        assert_eq!(
            content,
            "x11-wm/xmonad doc hscolour\n\
             dev-libs/libxml2 ipv6\n\
             sys-devel/gcc-4.5.4 cxx\n\
             x11-wm/xmonad-0.9.2 profile hscolour\n\
             sys-devel/gcc cxx fortran\n"
        );
    }

    #[test]
    fn test_commit_round_trip() {
        let (path, _dir) = create_use_file(TEST_ENTRIES);
        let mut store = FlagStore::load(&path).unwrap();
        store.extend("dev-lang/python", ["sqlite", "-tk", "xml"]);
        store.set("x11-wm/xmonad", Vec::<String>::new());

        let written = store.commit().unwrap();
        let reloaded = FlagStore::load(&written).unwrap();

        assert_eq!(
            entries(&reloaded),
            vec![
                ("dev-libs/libxml2".to_string(), vec!["ipv6".to_string(), "-python".to_string()]),
                ("sys-devel/gcc-4.5.4".to_string(), vec!["cxx".to_string()]),
                (
                    "dev-lang/python".to_string(),
                    vec!["sqlite".to_string(), "-tk".to_string(), "xml".to_string()]
                ),
            ]
        );
        assert_eq!(entries(&reloaded), entries(&store));
    }

    #[test]
    fn test_commit_to_replaces_destination() {
        let (path, _dir) = create_use_file(TEST_ENTRIES);
        let mut store = FlagStore::load(&path).unwrap();
        store.append("sys-devel/gcc-4.5.4", "-fortran");

        let written = store.commit_to(&path).unwrap();
        assert_eq!(written, path);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("sys-devel/gcc-4.5.4 cxx -fortran\n"));
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_commit_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = FlagStore::empty(dir.path().join("package.use"));

        let written = store.commit().unwrap();
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "");
    }

    #[test]
    fn test_commit_into_missing_directory_is_write_error() {
        let store = FlagStore::empty("/nonexistent/puz/package.use");
        assert_matches!(store.commit(), Err(StoreError::Write { .. }));
        assert_matches!(
            store.commit_to(std::path::Path::new("/nonexistent/puz/out.use")),
            Err(StoreError::Write { .. })
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_mode() {
        use std::os::unix::fs::PermissionsExt;

        let (path, _dir) = create_use_file(TEST_ENTRIES);
        let store = FlagStore::load(&path).unwrap();

        let written = store.commit().unwrap();
        let mode = std::fs::metadata(&written).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, puz_config::COMMIT_MODE);
    }
}
