// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML document decoder.

use crate::domain::{ConfigError, Mapping, Result, Value};
use crate::ports::FormatDecoder;

/// Decoder for `.yaml` and `.yml` files.
///
/// Nested mappings and sequences are kept as-is. Non-string mapping keys are
/// stored under their rendered form, so `1: one` is reachable as `"1"`. An empty
/// document decodes to an empty mapping.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::YamlDecoder;
/// use treecfg::domain::Value;
/// use treecfg::ports::FormatDecoder;
///
/// let map = YamlDecoder::new().decode("database:\n  host: localhost\n  port: 5432").unwrap();
/// assert_eq!(map["database"].get("port"), Some(&Value::from(5432)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlDecoder;

impl YamlDecoder {
    /// Creates a new YAML decoder.
    pub fn new() -> Self {
        YamlDecoder
    }
}

impl FormatDecoder for YamlDecoder {
    fn decode(&self, content: &str) -> Result<Mapping> {
        let document: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        match Value::from(document) {
            Value::Mapping(map) => Ok(map),
            Value::Null => Ok(Mapping::new()),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "YAML document must have a mapping at the top level, found {}",
                    other.kind()
                ),
                source: None,
            }),
        }
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
