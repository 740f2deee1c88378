//! # Node Paths and Names
//!
//! A path uniquely identifies a node's position in the whole tree. Front-ends
//! key their expansion state by path, so the same logical node must always
//! produce the same path.
//!
//! Paths are built as `parent/segment`. Synthetic segments start with
//! [`SAFE_PATH_PREFIX`]; real property names are escaped so that they can
//! contain neither a bare separator nor a leading `#`.

use crate::primitives::{PATH_SEPARATOR, SAFE_PATH_PREFIX};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// =============================================================================
// NODE PATH
// =============================================================================

/// Stable identifier of a node within one tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(String);

impl NodePath {
    /// Create a path from its textual form.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Get the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Child path for a real property name (escaped).
    #[must_use]
    pub fn join_property(&self, name: &str) -> Self {
        self.join_raw(&escape_path_segment(name))
    }

    /// Child path for a synthetic key (`##-` prefixed).
    #[must_use]
    pub fn join_reserved(&self, key: &str) -> Self {
        self.join_raw(&format!("{SAFE_PATH_PREFIX}{key}"))
    }

    /// Child path with a segment taken verbatim.
    ///
    /// Only for segments the engine produces itself (indices, map-entry
    /// markers, `__proto__`).
    #[must_use]
    pub fn join_raw(&self, segment: &str) -> Self {
        let mut path = String::with_capacity(self.0.len() + segment.len() + 1);
        path.push_str(&self.0);
        path.push(PATH_SEPARATOR);
        path.push_str(segment);
        Self(path)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodePath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// ESCAPING
// =============================================================================

/// Escape a property name for use as a path segment.
///
/// `\` and `/` are backslash-escaped and a leading `#` is escaped, so an
/// escaped segment never contains a bare separator and never starts with a
/// reserved prefix.
#[must_use]
pub fn escape_path_segment(name: &str) -> Cow<'_, str> {
    let needs_escape = name.starts_with('#') || name.contains(['\\', PATH_SEPARATOR]);
    if !needs_escape {
        return Cow::Borrowed(name);
    }

    let mut escaped = String::with_capacity(name.len() + 2);
    for (i, c) in name.chars().enumerate() {
        if c == '\\' || c == PATH_SEPARATOR || (i == 0 && c == '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// Quote a property name for display if it is not a plain word.
///
/// Names made of ASCII word characters are shown as-is. Anything else is
/// wrapped in double quotes with `"`, `\` and control characters escaped;
/// tab, newline and carriage return stay literal.
#[must_use]
pub fn escape_property_name(name: &str) -> Cow<'_, str> {
    let is_word = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_word {
        return Cow::Borrowed(name);
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\u{8}' => quoted.push_str("\\b"),
            '\u{c}' => quoted.push_str("\\f"),
            '\u{b}' => quoted.push_str("\\v"),
            '\t' | '\n' | '\r' => quoted.push(c),
            c if is_escaped_code_point(c) => {
                quoted.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

fn is_escaped_code_point(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}' | '\u{feff}' | '\u{2028}' | '\u{2029}')
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_builds_separated_paths() {
        let root = NodePath::new("root");
        assert_eq!(root.join_property("foo").as_str(), "root/foo");
        assert_eq!(root.join_reserved("entries").as_str(), "root/##-entries");
        assert_eq!(root.join_raw("0").as_str(), "root/0");
    }

    #[test]
    fn separator_in_name_cannot_collide() {
        let root = NodePath::new("root");
        let slashed = root.join_property("a/b");
        let nested = root.join_property("a").join_property("b");
        assert_ne!(slashed, nested);
        assert_eq!(slashed.as_str(), "root/a\\/b");
    }

    #[test]
    fn reserved_prefix_cannot_be_forged() {
        let root = NodePath::new("root");
        let forged = root.join_property("##-entries");
        assert_ne!(forged, root.join_reserved("entries"));
        assert_eq!(forged.as_str(), "root/\\##-entries");
    }

    #[test]
    fn plain_names_are_borrowed() {
        assert!(matches!(escape_path_segment("length"), Cow::Borrowed(_)));
        assert!(matches!(escape_property_name("length"), Cow::Borrowed(_)));
    }

    #[test]
    fn display_names_are_quoted_when_needed() {
        assert_eq!(escape_property_name("foo bar"), "\"foo bar\"");
        assert_eq!(escape_property_name("a\"b"), "\"a\\\"b\"");
        assert_eq!(escape_property_name(""), "\"\"");
        assert_eq!(escape_property_name("\u{1}"), "\"\\u0001\"");
        assert_eq!(escape_property_name("line\nbreak"), "\"line\nbreak\"");
    }
}
