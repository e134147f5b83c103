// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical key listings as returned by distributed key-value stores.

/// A node in a hierarchical key listing.
///
/// Directory nodes have children; leaf nodes carry a value. Keys are stored in
/// the store's native syntax (for etcd, slash-separated paths such as
/// `/cfg/db/host`), and every node holds its full key rather than a name
/// relative to its parent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyNode {
    /// Full key of this node
    pub key: String,
    /// Value stored at this key, if any
    pub value: Option<String>,
    /// Child nodes, in listing order
    pub nodes: Vec<KeyNode>,
}

impl KeyNode {
    /// Creates a directory node with no value and no children.
    pub fn dir(key: impl Into<String>) -> Self {
        KeyNode {
            key: key.into(),
            value: None,
            nodes: Vec::new(),
        }
    }

    /// Creates a leaf node.
    pub fn leaf(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyNode {
            key: key.into(),
            value: Some(value.into()),
            nodes: Vec::new(),
        }
    }

    /// Adds a child node, returning `self` for chaining.
    pub fn with_child(mut self, child: KeyNode) -> Self {
        self.nodes.push(child);
        self
    }

    /// Returns `true` if this node has children or no value.
    pub fn is_dir(&self) -> bool {
        !self.nodes.is_empty() || self.value.is_none()
    }

    /// Builds a tree rooted at `prefix` from a flat listing of `(key, value)` pairs.
    ///
    /// Keys are split on `/` below the prefix, creating intermediate directory
    /// nodes as needed. Only the prefix key itself and keys below it as a
    /// directory are kept, so `/cfg-staging/x` is dropped from a `/cfg` listing.
    ///
    /// # Examples
    ///
    /// ```
    /// use treecfg::domain::KeyNode;
    ///
    /// let root = KeyNode::from_listing("/cfg", vec![
    ///     ("/cfg/db/host".to_string(), "localhost".to_string()),
    ///     ("/cfg/x".to_string(), "1".to_string()),
    /// ]);
    /// assert_eq!(root.nodes[0].key, "/cfg/db");
    /// assert_eq!(root.nodes[0].nodes[0].value.as_deref(), Some("localhost"));
    /// ```
    pub fn from_listing<I>(prefix: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let dir = format!("{}/", prefix.trim_end_matches('/'));
        let mut root = KeyNode::dir(prefix);
        for (key, value) in pairs {
            if key != prefix && !key.starts_with(&dir) {
                continue;
            }
            if let Some(rest) = key.strip_prefix(prefix) {
                root.insert(&key, rest, value);
            }
        }
        root
    }

    fn insert(&mut self, full_key: &str, rest: &str, value: String) {
        let rest = rest.trim_start_matches('/');
        if rest.is_empty() {
            self.value = Some(value);
            return;
        }

        let end = rest.find('/').unwrap_or(rest.len());
        let child_key = &full_key[..full_key.len() - rest.len() + end];
        let index = match self.nodes.iter().rposition(|n| n.key == child_key) {
            Some(index) => index,
            None => {
                self.nodes.push(KeyNode::dir(child_key));
                self.nodes.len() - 1
            }
        };
        self.nodes[index].insert(full_key, &rest[end..], value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_listing_flat() {
        let root = KeyNode::from_listing("/cfg", pairs(&[("/cfg/x", "1"), ("/cfg/y", "2")]));
        assert!(root.is_dir());
        assert_eq!(root.nodes, vec![KeyNode::leaf("/cfg/x", "1"), KeyNode::leaf("/cfg/y", "2")]);
    }

    #[test]
    fn test_from_listing_nested() {
        let root = KeyNode::from_listing(
            "/cfg/",
            pairs(&[("/cfg/a/b/c", "deep"), ("/cfg/a/d", "shallow"), ("/cfg/e", "top")]),
        );
        let expected = KeyNode::dir("/cfg/")
            .with_child(
                KeyNode::dir("/cfg/a")
                    .with_child(KeyNode::dir("/cfg/a/b").with_child(KeyNode::leaf("/cfg/a/b/c", "deep")))
                    .with_child(KeyNode::leaf("/cfg/a/d", "shallow")),
            )
            .with_child(KeyNode::leaf("/cfg/e", "top"));
        assert_eq!(root, expected);
    }

    #[test]
    fn test_from_listing_value_on_prefix_and_directory() {
        let root = KeyNode::from_listing("/cfg", pairs(&[("/cfg", "self"), ("/cfg/a", "v"), ("/cfg/a/b", "w")]));
        assert_eq!(root.value.as_deref(), Some("self"));
        let a = &root.nodes[0];
        assert_eq!(a.value.as_deref(), Some("v"));
        assert!(a.is_dir());
        assert_eq!(a.nodes[0], KeyNode::leaf("/cfg/a/b", "w"));
    }

    #[test]
    fn test_from_listing_ignores_foreign_keys() {
        let root = KeyNode::from_listing("/cfg", pairs(&[("/other/x", "1")]));
        assert!(root.nodes.is_empty());
        assert!(root.value.is_none());
    }

    #[test]
    fn test_from_listing_skips_sibling_directories() {
        let root = KeyNode::from_listing(
            "/cfg",
            pairs(&[("/cfg-staging/secret", "leak"), ("/cfg/x", "1"), ("/cfgold/y", "2")]),
        );
        assert_eq!(root.nodes, vec![KeyNode::leaf("/cfg/x", "1")]);

        let slashed = KeyNode::from_listing("/cfg/", pairs(&[("/cfg/x", "1"), ("/cfg-b/x", "2")]));
        assert_eq!(slashed.nodes, vec![KeyNode::leaf("/cfg/x", "1")]);
    }

    #[test]
    fn test_leaf_is_not_dir() {
        assert!(!KeyNode::leaf("/k", "v").is_dir());
        assert!(KeyNode::dir("/k").is_dir());
    }
}
