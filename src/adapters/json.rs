// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON document decoder.

use crate::domain::{ConfigError, Mapping, Result, Value};
use crate::ports::FormatDecoder;

/// Decoder for `.json` files.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::JsonDecoder;
/// use treecfg::domain::Value;
/// use treecfg::ports::FormatDecoder;
///
/// let map = JsonDecoder::new().decode(r#"{"a": {"b": 5}}"#).unwrap();
/// assert_eq!(map["a"].get("b"), Some(&Value::from(5)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Creates a new JSON decoder.
    pub fn new() -> Self {
        JsonDecoder
    }
}

impl FormatDecoder for JsonDecoder {
    fn decode(&self, content: &str) -> Result<Mapping> {
        let document: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse JSON: {}", e),
                source: Some(Box::new(e)),
            })?;

        match Value::from(document) {
            Value::Mapping(map) => Ok(map),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "JSON document must have a mapping at the top level, found {}",
                    other.kind()
                ),
                source: None,
            }),
        }
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}
