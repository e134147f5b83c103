// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prefix-based backend over a hierarchical key-value store.
//!
//! The backend lists each configured prefix recursively and flattens the
//! resulting tree into a single-level mapping keyed by each leaf's full key.

use crate::domain::{ConfigError, KeyNode, Mapping, Result, Value};
use crate::ports::{ConfigBackend, KeyTreeStore};

/// Configuration backend that loads key prefixes from a distributed store.
///
/// Leaf keys are stored flat under the store's native key syntax, so a leaf at
/// `/cfg/db/host` is looked up as `"/cfg/db/host"`, not as a nested mapping.
/// With the default `.` delimiter such keys resolve as a single segment.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::DistributedBackend;
/// use treecfg::domain::{KeyNode, Result, Value};
/// use treecfg::ports::{ConfigBackend, KeyTreeStore};
///
/// struct Fixed;
///
/// impl KeyTreeStore for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn list_tree(&self, prefix: &str) -> Result<Option<KeyNode>> {
///         Ok(Some(KeyNode::from_listing(prefix, vec![
///             (format!("{}/x", prefix), "1".to_string()),
///             (format!("{}/y", prefix), "2".to_string()),
///         ])))
///     }
/// }
///
/// let backend = DistributedBackend::new(Fixed, ["/cfg"]);
/// let mapping = backend.produce().unwrap();
/// assert_eq!(mapping.get("/cfg/x"), Some(&Value::from("1")));
/// assert_eq!(mapping.get("/cfg/y"), Some(&Value::from("2")));
/// ```
#[derive(Debug)]
pub struct DistributedBackend<S> {
    /// Store the prefixes are listed from
    store: S,
    /// Key prefixes to load, in order
    prefixes: Vec<String>,
}

impl<S: KeyTreeStore> DistributedBackend<S> {
    /// Creates a backend that loads the given prefixes from `store`.
    pub fn new<I, P>(store: S, prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            store,
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the configured prefixes.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads every prefix into `config`, stopping at the first failure.
    ///
    /// Entries merged from prefixes listed before the failing one stay in
    /// `config`. [`produce`](ConfigBackend::produce) discards them, so a store
    /// never publishes a partial load.
    pub fn load_into(&self, config: &mut Mapping) -> Result<()> {
        for prefix in &self.prefixes {
            self.read_prefix(prefix, config)?;
        }
        Ok(())
    }

    fn read_prefix(&self, prefix: &str, config: &mut Mapping) -> Result<()> {
        let node = self
            .store
            .list_tree(prefix)?
            .ok_or_else(|| ConfigError::SourceError {
                source_name: self.store.name().to_string(),
                message: format!("No node found for prefix '{}'", prefix),
                source: None,
            })?;

        walk_nodes(&node, config);
        Ok(())
    }
}

/// Records every node that carries a value under its full key.
fn walk_nodes(node: &KeyNode, config: &mut Mapping) {
    if let Some(value) = &node.value {
        tracing::trace!("{} : {}", node.key, value);
        config.insert(node.key.clone(), Value::String(value.clone()));
    }

    for child in &node.nodes {
        walk_nodes(child, config);
    }
}

impl<S: KeyTreeStore> ConfigBackend for DistributedBackend<S> {
    fn name(&self) -> &str {
        self.store.name()
    }

    fn produce(&self) -> Result<Mapping> {
        let mut config = Mapping::new();
        self.load_into(&mut config)?;
        tracing::debug!(
            "Loaded {} keys from {} prefixes of '{}'",
            config.len(),
            self.prefixes.len(),
            self.store.name()
        );
        Ok(config)
    }
}
