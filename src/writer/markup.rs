//! HTML tag stripping for the plain-text twin of markup copies.

use std::sync::LazyLock;

use regex::Regex;

/// Any `<...>` run, tags and comments alike.
const TAG: &str = r"<[^>]+>";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(TAG).expect("tag pattern is valid"));

/// Remove every `<...>` substring. Entities and whitespace are left
/// untouched.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}
