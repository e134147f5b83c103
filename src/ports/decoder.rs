// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document decoder trait definition.
//!
//! This module defines the `FormatDecoder` trait, which turns the raw content of
//! a configuration file into a [`Mapping`]. The file backend selects a decoder
//! by file extension.

use crate::domain::{Mapping, Result};

/// A trait for decoding configuration documents.
///
/// Unlike a flattening parser, a decoder keeps the document's nesting intact:
/// nested mappings stay nested and sequences stay sequences. The top level of
/// every document must be a mapping.
///
/// # Examples
///
/// ```rust
/// use treecfg::domain::{Mapping, Result, Value};
/// use treecfg::ports::FormatDecoder;
///
/// struct KeyEqualsValue;
///
/// impl FormatDecoder for KeyEqualsValue {
///     fn decode(&self, content: &str) -> Result<Mapping> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim().to_string(), Value::from(v.trim())))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["properties"]
///     }
/// }
///
/// let map = KeyEqualsValue.decode("a = 1\nb = two").unwrap();
/// assert_eq!(map.get("b"), Some(&Value::from("two")));
/// ```
pub trait FormatDecoder: Send + Sync {
    /// Decodes document content into a mapping.
    ///
    /// # Returns
    ///
    /// * `Ok(Mapping)` - The decoded document
    /// * `Err(ConfigError)` - The content is malformed or its top level is not a mapping
    fn decode(&self, content: &str) -> Result<Mapping>;

    /// Returns the file extensions handled by this decoder, without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Returns `true` if this decoder handles the given extension (case-insensitive).
    fn supports(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
