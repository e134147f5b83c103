// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hierarchical key-value store trait definition.
//!
//! The distributed backend talks to its store only through `KeyTreeStore`, which
//! keeps the wire protocol and client library out of the flattening logic.

use crate::domain::{KeyNode, Result};

/// A key-value store that can list everything under a key prefix as a tree.
///
/// Listings must be recursive, sorted by key and read with quorum (linearizable)
/// consistency where the store offers a choice.
///
/// # Examples
///
/// ```rust
/// use treecfg::domain::{KeyNode, Result};
/// use treecfg::ports::KeyTreeStore;
///
/// struct OneKey;
///
/// impl KeyTreeStore for OneKey {
///     fn name(&self) -> &str {
///         "one-key"
///     }
///
///     fn list_tree(&self, prefix: &str) -> Result<Option<KeyNode>> {
///         if prefix == "/cfg" {
///             Ok(Some(KeyNode::dir("/cfg").with_child(KeyNode::leaf("/cfg/x", "1"))))
///         } else {
///             Ok(None)
///         }
///     }
/// }
///
/// assert!(OneKey.list_tree("/cfg").unwrap().is_some());
/// assert!(OneKey.list_tree("/other").unwrap().is_none());
/// ```
pub trait KeyTreeStore: Send + Sync {
    /// Returns a short name for this store, used in logs and errors.
    fn name(&self) -> &str;

    /// Lists every key under `prefix`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(node))` - The tree rooted at `prefix`
    /// * `Ok(None)` - Nothing is stored under `prefix`
    /// * `Err(ConfigError)` - The store could not be reached or refused the request
    fn list_tree(&self, prefix: &str) -> Result<Option<KeyNode>>;
}
