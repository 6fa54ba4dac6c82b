//! Package identifier splitting
//!
//! Report entries name a package as `category/name-version`, optionally
//! followed by a slot and repository (`dev-libs/libxml2-2.8.0-r2:2`). The
//! name may itself contain hyphens (`sys-kernel/gentoo-sources-3.8.13`), so
//! the version starts at the first `-digit` boundary that begins a valid
//! version.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Gentoo version grammar with an opaque slot/repository tail
    static ref STRICT_IDENTIFIER: Regex = Regex::new(concat!(
        r"^(?P<name>[A-Za-z0-9+_.\-]+/[A-Za-z0-9+_][A-Za-z0-9+_.\-]*?)",
        r"-(?P<version>[0-9]+(?:\.[0-9]+)*[a-z]?(?:_(?:alpha|beta|pre|rc|p)[0-9]*)*(?:-r[0-9]+)?(?::\S*)?)$",
    ))
    .unwrap();

    // Anything from the first -digit boundary
    static ref LOOSE_IDENTIFIER: Regex = Regex::new(
        r"^(?P<name>[A-Za-z0-9+_.\-]+/[A-Za-z0-9+_][A-Za-z0-9+_.\-]*?)-(?P<version>[0-9]\S*)$"
    )
    .unwrap();
}

/// Split a report token into package name and version.
///
/// Trailing punctuation left over from line wrapping is dropped before
/// matching. Returns `None` if the token is not a versioned identifier.
///
/// ```
/// use puz_package::atom::split_name_version;
///
/// assert_eq!(
///     split_name_version("dev-libs/libxml2-2.8.0-r2:2"),
///     Some(("dev-libs/libxml2", "2.8.0-r2:2"))
/// );
/// assert_eq!(split_name_version("dev-libs/libxml2"), None);
/// ```
pub fn split_name_version(token: &str) -> Option<(&str, &str)> {
    let token = token.trim_end_matches(|c: char| !c.is_ascii_alphanumeric());

    let captures = STRICT_IDENTIFIER
        .captures(token)
        .or_else(|| LOOSE_IDENTIFIER.captures(token))?;

    let name = captures.name("name")?.as_str();
    let version = captures.name("version")?.as_str();
    Some((name, version))
}
