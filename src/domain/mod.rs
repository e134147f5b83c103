// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module contains the value tree, key paths, key listings and errors. It is
//! independent of any backend and defines the fundamental concepts used
//! throughout the library.

mod cast;
pub mod config_value;
pub mod errors;
pub mod key_node;
pub mod key_path;

// Re-export commonly used types
pub use config_value::{Mapping, Value};
pub use errors::{ConfigError, Result};
pub use key_node::KeyNode;
pub use key_path::{KeyPath, DEFAULT_DELIMITER};
