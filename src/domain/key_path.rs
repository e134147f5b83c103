// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delimited key paths used to navigate nested mappings.

use crate::domain::{Mapping, Value};
use std::fmt;

/// The delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = ".";

/// A lookup key such as `database.primary.host`.
///
/// The path is split into segments by a delimiter that is only known at lookup
/// time, so the same `KeyPath` can be resolved against stores configured with
/// different delimiters.
///
/// # Examples
///
/// ```
/// use treecfg::domain::KeyPath;
///
/// let key = KeyPath::from("database.primary.host");
/// assert_eq!(key.segments("."), vec!["database", "primary", "host"]);
/// assert_eq!(key.segments("/"), vec!["database.primary.host"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyPath(String);

impl KeyPath {
    /// Creates a new `KeyPath` from a `String`.
    pub fn new(path: String) -> Self {
        KeyPath(path)
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the path into segments.
    ///
    /// An empty delimiter never splits, so the whole path is a single segment.
    pub fn segments<'a>(&'a self, delimiter: &str) -> Vec<&'a str> {
        if delimiter.is_empty() {
            vec![self.0.as_str()]
        } else {
            self.0.split(delimiter).collect()
        }
    }

    /// Resolves the path against a mapping.
    ///
    /// Every segment but the last must name a nested mapping. A missing
    /// segment, or one that names a scalar or sequence, resolves to `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treecfg::domain::{KeyPath, Mapping, Value};
    ///
    /// let mut inner = Mapping::new();
    /// inner.insert("b".to_string(), Value::from(5));
    /// let mut root = Mapping::new();
    /// root.insert("a".to_string(), Value::Mapping(inner));
    ///
    /// assert_eq!(KeyPath::from("a.b").resolve(&root, "."), Some(&Value::from(5)));
    /// assert_eq!(KeyPath::from("a.b.c").resolve(&root, "."), None);
    /// assert_eq!(KeyPath::from("a:b").resolve(&root, ":"), Some(&Value::from(5)));
    /// ```
    pub fn resolve<'m>(&self, root: &'m Mapping, delimiter: &str) -> Option<&'m Value> {
        let segments = self.segments(delimiter);
        let (last, parents) = segments.split_last()?;

        let mut current = root;
        for segment in parents {
            current = current.get(*segment)?.as_mapping()?;
        }
        current.get(*last)
    }
}

impl From<String> for KeyPath {
    fn from(s: String) -> Self {
        KeyPath(s)
    }
}

impl From<&str> for KeyPath {
    fn from(s: &str) -> Self {
        KeyPath(s.to_string())
    }
}

impl AsRef<str> for KeyPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Mapping {
        match Value::from(serde_json::json!({
            "app": {"db": {"host": "localhost", "port": 5432}, "tags": ["a"]},
            "flat.key": "dotted",
            "/cfg/x": "1",
            "": "empty"
        })) {
            Value::Mapping(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_segments_default_delimiter() {
        let key = KeyPath::from("a.b.c");
        assert_eq!(key.segments(DEFAULT_DELIMITER), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_segments_multichar_delimiter() {
        let key = KeyPath::from("a::b");
        assert_eq!(key.segments("::"), vec!["a", "b"]);
    }

    #[test]
    fn test_segments_empty_delimiter() {
        let key = KeyPath::from("a.b");
        assert_eq!(key.segments(""), vec!["a.b"]);
    }

    #[test]
    fn test_resolve_nested() {
        let root = tree();
        assert_eq!(
            KeyPath::from("app.db.host").resolve(&root, "."),
            Some(&Value::from("localhost"))
        );
        assert_eq!(
            KeyPath::from("app.db.port").resolve(&root, "."),
            Some(&Value::from(5432))
        );
        assert!(KeyPath::from("app.db")
            .resolve(&root, ".")
            .and_then(Value::as_mapping)
            .is_some());
    }

    #[test]
    fn test_resolve_missing_or_through_scalar() {
        let root = tree();
        assert_eq!(KeyPath::from("app.db.user").resolve(&root, "."), None);
        assert_eq!(KeyPath::from("nope.db.host").resolve(&root, "."), None);
        assert_eq!(KeyPath::from("app.db.host.len").resolve(&root, "."), None);
        assert_eq!(KeyPath::from("app.tags.0").resolve(&root, "."), None);
    }

    #[test]
    fn test_resolve_keys_containing_default_delimiter() {
        let root = tree();
        assert_eq!(KeyPath::from("flat.key").resolve(&root, "."), None);
        assert_eq!(
            KeyPath::from("flat.key").resolve(&root, "/"),
            Some(&Value::from("dotted"))
        );
        assert_eq!(
            KeyPath::from("/cfg/x").resolve(&root, "."),
            Some(&Value::from("1"))
        );
    }

    #[test]
    fn test_resolve_empty_path() {
        let root = tree();
        assert_eq!(KeyPath::from("").resolve(&root, "."), Some(&Value::from("empty")));
    }

    #[test]
    fn test_display_and_as_ref() {
        let key = KeyPath::new("x.y".to_string());
        assert_eq!(key.to_string(), "x.y");
        let s: &str = key.as_ref();
        assert_eq!(s, "x.y");
    }
}
