// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration watcher trait definition.
//!
//! This module defines the `ConfigWatcher` trait, which provides an interface for
//! watching a configuration source for changes and handing the re-decoded mapping
//! to a callback.

use crate::domain::{Mapping, Result};
use std::sync::Arc;

/// Type alias for change notification callbacks.
///
/// The callback receives the freshly decoded mapping after each change.
pub type ChangeCallback = Arc<dyn Fn(Mapping) + Send + Sync>;

/// A trait for watching configuration sources for changes.
///
/// Watching never blocks the caller: `watch` starts background work and returns,
/// and `stop` cancels it.
///
/// # Examples
///
/// ```rust
/// use treecfg::domain::Result;
/// use treecfg::ports::{ChangeCallback, ConfigWatcher};
///
/// struct MyWatcher;
///
/// impl ConfigWatcher for MyWatcher {
///     fn watch(&mut self, _callback: ChangeCallback) -> Result<()> {
///         Ok(())
///     }
///
///     fn stop(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait ConfigWatcher: Send + Sync {
    /// Starts watching for configuration changes.
    ///
    /// The callback should be non-blocking to avoid delaying the watcher.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The watcher was successfully started
    /// * `Err(ConfigError)` - The watcher could not be started or is already running
    fn watch(&mut self, callback: ChangeCallback) -> Result<()>;

    /// Stops watching for configuration changes.
    ///
    /// After this returns no more callbacks are invoked. Stopping a watcher that
    /// is not running is a no-op.
    fn stop(&mut self) -> Result<()>;
}
