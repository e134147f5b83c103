// SPDX-License-Identifier: MIT OR Apache-2.0

//! Watchers that detect configuration changes and re-decode the source.

#[cfg(feature = "reload")]
pub mod file_watcher;

#[cfg(feature = "reload")]
pub use file_watcher::FileWatcher;
