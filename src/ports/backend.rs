// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration backend trait definition.
//!
//! This module defines the `ConfigBackend` trait, which is the primary port for
//! plugging data sources into the [`ConfigStore`](crate::service::ConfigStore).
//! Any data source (local files, distributed key-value stores, HTTP endpoints,
//! etc.) implements this single capability.

use crate::domain::{Mapping, Result};

/// A source that can produce a complete configuration mapping on demand.
///
/// Each call to [`produce`](ConfigBackend::produce) reads the source afresh and
/// returns a fully decoded mapping. Backends hold no snapshot of their own; the
/// store decides when to call them and publishes the result.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a store can be shared across threads.
///
/// # Examples
///
/// ```rust
/// use treecfg::domain::{Mapping, Result, Value};
/// use treecfg::ports::ConfigBackend;
///
/// struct Fixed;
///
/// impl ConfigBackend for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn produce(&self) -> Result<Mapping> {
///         let mut map = Mapping::new();
///         map.insert("answer".to_string(), Value::from(42));
///         Ok(map)
///     }
/// }
///
/// let map = Fixed.produce().unwrap();
/// assert_eq!(map.get("answer"), Some(&Value::from(42)));
/// ```
pub trait ConfigBackend: Send + Sync {
    /// Returns a short name for this backend, used in logs and errors.
    fn name(&self) -> &str;

    /// Reads the source and returns the decoded mapping.
    ///
    /// # Returns
    ///
    /// * `Ok(Mapping)` - The complete configuration document
    /// * `Err(ConfigError)` - The source could not be read or decoded
    fn produce(&self) -> Result<Mapping>;
}

impl<B: ConfigBackend + ?Sized> ConfigBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn produce(&self) -> Result<Mapping> {
        (**self).produce()
    }
}
