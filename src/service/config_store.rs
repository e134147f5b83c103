// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapshot-based configuration store.
//!
//! A [`ConfigStore`] owns one backend and the last mapping it produced. Lookups
//! run against that snapshot under a shared lock; [`ConfigStore::read_in_config`]
//! asks the backend for a fresh mapping and swaps it in whole.

use crate::adapters::FileBackend;
use crate::domain::{ConfigError, KeyPath, Mapping, Result, Value, DEFAULT_DELIMITER};
use crate::ports::ConfigBackend;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// The live configuration and the number of successful loads behind it.
struct Snapshot {
    data: Arc<Mapping>,
    version: u64,
}

/// Configuration store with typed, delimiter-separated path lookups.
///
/// The store starts empty. Each successful [`read_in_config`](Self::read_in_config)
/// replaces the snapshot; a failed one leaves it untouched. The typed getters
/// (`get_string`, `get_int`, ...) never fail: a missing path or a value that
/// cannot be coerced yields the type's zero value. Use [`require`](Self::require)
/// or [`get_as`](Self::get_as) when the difference matters.
///
/// # Examples
///
/// ```rust,no_run
/// use treecfg::service::ConfigStore;
///
/// # fn main() -> treecfg::domain::Result<()> {
/// let store = ConfigStore::from_file("/etc/myapp/config.yaml");
/// store.read_in_config()?;
///
/// let host = store.get_string("database.host");
/// let port = store.get_int("database.port");
/// let debug = store.get_bool("debug");
/// # Ok(())
/// # }
/// ```
pub struct ConfigStore {
    /// Backend producing new snapshots
    backend: Box<dyn ConfigBackend>,
    /// Current snapshot
    state: RwLock<Snapshot>,
    /// Path segment separator
    delimiter: RwLock<String>,
}

impl ConfigStore {
    /// Creates an empty store over the given backend.
    ///
    /// Nothing is loaded until [`read_in_config`](Self::read_in_config) is called.
    pub fn new(backend: impl ConfigBackend + 'static) -> Self {
        Self::with_boxed_backend(Box::new(backend), DEFAULT_DELIMITER.to_string())
    }

    fn with_boxed_backend(backend: Box<dyn ConfigBackend>, delimiter: String) -> Self {
        Self {
            backend,
            state: RwLock::new(Snapshot {
                data: Arc::new(Mapping::new()),
                version: 0,
            }),
            delimiter: RwLock::new(delimiter),
        }
    }

    /// Creates an empty store that reads the given file.
    ///
    /// The file format is chosen by extension when the file is loaded.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::new(FileBackend::new(path))
    }

    /// Creates a new store builder.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use treecfg::service::ConfigStore;
    ///
    /// # fn main() -> treecfg::domain::Result<()> {
    /// let store = ConfigStore::builder()
    ///     .with_file("/etc/myapp/config.json")
    ///     .with_delimiter("::")
    ///     .build()?;
    /// store.read_in_config()?;
    /// let level = store.get_string("logging::level");
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> ConfigStoreBuilder {
        ConfigStoreBuilder::new()
    }

    /// Sets the delimiter, consuming and returning the store.
    pub fn with_delimiter(self, delimiter: impl Into<String>) -> Self {
        self.set_delimiter(delimiter);
        self
    }

    /// Returns the name of the backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Returns the current path delimiter.
    pub fn delimiter(&self) -> String {
        read_lock(&self.delimiter).clone()
    }

    /// Changes the path delimiter for all later lookups.
    ///
    /// Loaded data is not touched. An empty delimiter makes every path a single
    /// segment.
    pub fn set_delimiter(&self, delimiter: impl Into<String>) {
        *write_lock(&self.delimiter) = delimiter.into();
    }

    /// Loads a new snapshot from the backend.
    ///
    /// The backend runs without holding the lock, so readers are never blocked
    /// by backend I/O. On failure the previous snapshot stays in place and the
    /// backend's error is returned unchanged.
    pub fn read_in_config(&self) -> Result<()> {
        let mapping = match self.backend.produce() {
            Ok(mapping) => mapping,
            Err(e) => {
                tracing::warn!(
                    "Failed to load configuration from '{}': {}",
                    self.backend.name(),
                    e
                );
                return Err(e);
            }
        };

        let keys = mapping.len();
        let version = {
            let mut state = write_lock(&self.state);
            state.data = Arc::new(mapping);
            state.version += 1;
            state.version
        };

        tracing::debug!(
            "Loaded configuration version {} from '{}' ({} top-level keys)",
            version,
            self.backend.name(),
            keys
        );
        Ok(())
    }

    /// Returns the current snapshot.
    ///
    /// The returned mapping is immutable and stays valid after later reloads.
    pub fn snapshot(&self) -> Arc<Mapping> {
        Arc::clone(&read_lock(&self.state).data)
    }

    /// Returns the number of successful loads so far.
    pub fn version(&self) -> u64 {
        read_lock(&self.state).version
    }

    /// Returns `true` once a snapshot has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.version() > 0
    }

    /// Looks up the value at `path`.
    ///
    /// Every segment but the last must name a nested mapping; otherwise the
    /// lookup is `None`. An explicit null in the document is returned as
    /// [`Value::Null`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use treecfg::adapters::JsonDecoder;
    /// use treecfg::domain::{Mapping, Result, Value};
    /// use treecfg::ports::{ConfigBackend, FormatDecoder};
    /// use treecfg::service::ConfigStore;
    ///
    /// struct Inline;
    ///
    /// impl ConfigBackend for Inline {
    ///     fn name(&self) -> &str {
    ///         "inline"
    ///     }
    ///
    ///     fn produce(&self) -> Result<Mapping> {
    ///         JsonDecoder::new().decode(r#"{"a": {"b": 5}, "s": "str"}"#)
    ///     }
    /// }
    ///
    /// let store = ConfigStore::new(Inline);
    /// store.read_in_config().unwrap();
    /// assert_eq!(store.get("a.b"), Some(Value::from(5)));
    /// assert_eq!(store.get("s.x"), None);
    /// ```
    pub fn get(&self, path: &str) -> Option<Value> {
        let delimiter = self.delimiter();
        let state = read_lock(&self.state);
        KeyPath::from(path).resolve(&state.data, &delimiter).cloned()
    }

    /// Returns `true` if `path` resolves to a value.
    pub fn contains(&self, path: &str) -> bool {
        let delimiter = self.delimiter();
        let state = read_lock(&self.state);
        KeyPath::from(path).resolve(&state.data, &delimiter).is_some()
    }

    /// Looks up the value at `path`, failing if it is absent.
    pub fn require(&self, path: &str) -> Result<Value> {
        self.get(path).ok_or_else(|| ConfigError::ConfigKeyNotFound {
            key: path.to_string(),
        })
    }

    fn coerce<T: Default>(&self, path: &str, coerce: impl FnOnce(&Value) -> Option<T>) -> T {
        self.get(path).as_ref().and_then(coerce).unwrap_or_default()
    }

    /// Returns the value at `path` as a string, or `""`.
    pub fn get_string(&self, path: &str) -> String {
        self.coerce(path, Value::as_string)
    }

    /// Returns the value at `path` as a boolean, or `false`.
    pub fn get_bool(&self, path: &str) -> bool {
        self.coerce(path, Value::as_bool)
    }

    /// Returns the value at `path` as an integer, or `0`.
    ///
    /// Integers are 64 bits wide, so this agrees with [`get_int64`](Self::get_int64).
    pub fn get_int(&self, path: &str) -> i64 {
        self.coerce(path, Value::as_i64)
    }

    /// Returns the value at `path` as an `i64`, or `0`.
    pub fn get_int64(&self, path: &str) -> i64 {
        self.coerce(path, Value::as_i64)
    }

    /// Returns the value at `path` as an `f64`, or `0.0`.
    pub fn get_float64(&self, path: &str) -> f64 {
        self.coerce(path, Value::as_f64)
    }

    /// Returns the value at `path` as a UTC timestamp, or the unix epoch.
    pub fn get_time(&self, path: &str) -> DateTime<Utc> {
        self.get(path)
            .as_ref()
            .and_then(Value::as_time)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Returns the value at `path` as a duration, or zero.
    pub fn get_duration(&self, path: &str) -> Duration {
        self.coerce(path, Value::as_duration)
    }

    /// Returns the value at `path` as a list of strings, or an empty list.
    pub fn get_string_slice(&self, path: &str) -> Vec<String> {
        self.coerce(path, Value::as_string_slice)
    }

    /// Returns the sequence at `path`, or an empty list.
    pub fn get_slice(&self, path: &str) -> Vec<Value> {
        self.coerce(path, Value::as_slice)
    }

    /// Returns the mapping at `path`, or an empty mapping.
    pub fn get_string_map(&self, path: &str) -> Mapping {
        self.coerce(path, Value::as_string_map)
    }

    /// Returns the mapping at `path` with its values as strings.
    pub fn get_string_map_string(&self, path: &str) -> BTreeMap<String, String> {
        self.coerce(path, Value::as_string_map_string)
    }

    /// Returns the sequence of mappings at `path`, or an empty list.
    pub fn get_slice_of_string_maps(&self, path: &str) -> Vec<Mapping> {
        self.coerce(path, Value::as_slice_of_string_maps)
    }

    /// Returns the mapping at `path` with its values as string lists.
    pub fn get_string_map_string_slice(&self, path: &str) -> BTreeMap<String, Vec<String>> {
        self.coerce(path, Value::as_string_map_string_slice)
    }

    /// Decodes the value at `path` into `T`.
    ///
    /// Fails with [`ConfigError::ConfigKeyNotFound`] if the path is absent and
    /// [`ConfigError::DecodeError`] if the value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.require(path)?;
        decode_value(path, value)
    }

    /// Decodes the value at `path`, or the whole snapshot for an empty path, into `T`.
    ///
    /// Mapping keys are matched to field names. An absent path decodes as null,
    /// so `Option` fields and `#[serde(default)]` structures still succeed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use serde::Deserialize;
    /// use treecfg::service::ConfigStore;
    ///
    /// #[derive(Deserialize)]
    /// struct Database {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// # fn main() -> treecfg::domain::Result<()> {
    /// let store = ConfigStore::from_file("/etc/myapp/config.yaml");
    /// store.read_in_config()?;
    /// let db: Database = store.decode_into("database")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn decode_into<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        if path.is_empty() {
            let snapshot = self.snapshot();
            return decode_value(path, Value::Mapping((*snapshot).clone()));
        }
        decode_value(path, self.get(path).unwrap_or_default())
    }
}

fn decode_value<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    let json = serde_json::to_value(value).map_err(|e| ConfigError::decode(path, e))?;
    serde_json::from_value(json).map_err(|e| ConfigError::decode(path, e))
}

// Snapshots are swapped whole, so a poisoned lock still holds consistent data.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = read_lock(&self.state);
        f.debug_struct("ConfigStore")
            .field("backend", &self.backend.name())
            .field("delimiter", &*read_lock(&self.delimiter))
            .field("version", &state.version)
            .field("keys", &state.data.len())
            .finish()
    }
}

/// Builder for constructing a [`ConfigStore`].
///
/// # Examples
///
/// ```rust
/// use treecfg::service::ConfigStoreBuilder;
///
/// # fn main() -> treecfg::domain::Result<()> {
/// let store = ConfigStoreBuilder::new()
///     .with_file("config.yaml")
///     .with_delimiter("/")
///     .build()?;
/// assert_eq!(store.delimiter(), "/");
/// assert!(!store.is_loaded());
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigStoreBuilder {
    backend: Option<Box<dyn ConfigBackend>>,
    delimiter: Option<String>,
}

impl ConfigStoreBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend, replacing any set before.
    pub fn with_backend(mut self, backend: impl ConfigBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Uses a [`FileBackend`] for the given path.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_backend(FileBackend::new(path))
    }

    /// Sets the path delimiter (default `.`).
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Builds the store. Fails if no backend was set.
    pub fn build(self) -> Result<ConfigStore> {
        let backend = self.backend.ok_or_else(|| ConfigError::SourceError {
            source_name: "builder".to_string(),
            message: "No configuration backend was set".to_string(),
            source: None,
        })?;
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| DEFAULT_DELIMITER.to_string());
        Ok(ConfigStore::with_boxed_backend(backend, delimiter))
    }
}
