// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between the config store and the outside world. These traits are implemented
//! by adapters in the adapters layer.

pub mod backend;
pub mod decoder;
pub mod key_store;
pub mod watcher;

// Re-export commonly used types
pub use backend::ConfigBackend;
pub use decoder::FormatDecoder;
pub use key_store::KeyTreeStore;
pub use watcher::{ChangeCallback, ConfigWatcher};
