// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tree-shaped configuration with delimiter-separated typed lookups.
//!
//! This crate loads a nested key-value document from a pluggable backend into an
//! in-memory snapshot and answers lookups such as `database.primary.host`
//! against it. Backends are a local YAML or JSON file and a prefix listing from
//! an etcd cluster.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: the value tree, key paths, key listings and errors
//! - **Ports**: traits for backends, format decoders, key stores and watchers
//! - **Adapters**: the file backend, JSON/YAML decoders, the distributed backend
//!   and its etcd store, and the file watcher
//! - **Service**: the [`ConfigStore`](service::ConfigStore) that owns the snapshot
//!
//! # Feature Flags
//!
//! - `yaml`: YAML file support (default)
//! - `reload`: watch a configuration file and re-decode it on change
//! - `etcd`: load key prefixes from an etcd cluster
//! - `full`: all of the above
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use treecfg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let store = ConfigStore::from_file("config.yaml");
//! store.read_in_config()?;
//!
//! let host = store.get_string("database.host");
//! let timeout = store.get_duration("database.timeout");
//! let replicas = store.get_string_slice("database.replicas");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{DistributedBackend, FileBackend, JsonDecoder};
    pub use crate::domain::{ConfigError, KeyNode, KeyPath, Mapping, Result, Value};
    pub use crate::ports::{ConfigBackend, ConfigWatcher, FormatDecoder, KeyTreeStore};
    pub use crate::service::{ConfigStore, ConfigStoreBuilder};

    #[cfg(feature = "etcd")]
    pub use crate::adapters::{EtcdBackend, EtcdOptions};
    #[cfg(feature = "reload")]
    pub use crate::adapters::FileWatcher;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlDecoder;
}
