// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value tree with best-effort type coercions.
//!
//! A loaded configuration document is a [`Mapping`] of string keys to [`Value`]s,
//! where each value is a scalar, a sequence or another mapping. The `as_*`
//! coercions return `None` when a value cannot be represented as the requested
//! type, so callers decide whether a mismatch is an error or a default.

use crate::domain::cast;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// A mapping from string keys to configuration values.
pub type Mapping = BTreeMap<String, Value>;

/// A node in a configuration tree.
///
/// # Examples
///
/// ```
/// use treecfg::domain::{Mapping, Value};
///
/// let mut server = Mapping::new();
/// server.insert("port".to_string(), Value::from(8080));
/// let value = Value::Mapping(server);
///
/// assert_eq!(value.get("port").and_then(Value::as_i64), Some(8080));
/// assert_eq!(value.get("port").and_then(Value::as_string), Some("8080".to_string()));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// An explicit null.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Sequence(Vec<Value>),
    /// A nested mapping.
    Mapping(Mapping),
}

impl Value {
    /// Returns a short name for the kind of value, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Looks up a direct child of a mapping value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Borrows the inner string of a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the inner mapping of a [`Value::Mapping`].
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Borrows the inner items of a [`Value::Sequence`].
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Coerces a scalar into a string.
    ///
    /// Strings are returned as-is, booleans and numbers are formatted.
    /// Nulls, sequences and mappings have no string form.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }

    /// Coerces a value into a boolean.
    ///
    /// Numbers are `true` when non-zero. Strings are matched against the usual
    /// spellings (`true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`, ...).
    ///
    /// # Examples
    ///
    /// ```
    /// use treecfg::domain::Value;
    ///
    /// assert_eq!(Value::from("on").as_bool(), Some(true));
    /// assert_eq!(Value::from(0).as_bool(), Some(false));
    /// assert_eq!(Value::from("perhaps").as_bool(), None);
    /// ```
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Float(f) => Some(*f != 0.0),
            Value::String(s) => cast::parse_bool(s),
            _ => None,
        }
    }

    /// Coerces a value into an `i64`, truncating floats.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => cast::float_to_i64(*f),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::String(s) => cast::parse_i64(s),
            _ => None,
        }
    }

    /// Coerces a value into an `i32`, rejecting values out of range.
    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().and_then(|i| i32::try_from(i).ok())
    }

    /// Coerces a value into an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => cast::parse_f64(s),
            _ => None,
        }
    }

    /// Coerces a value into a UTC timestamp.
    ///
    /// Strings may be RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or
    /// `YYYY-MM-DD`. Numbers are unix seconds.
    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::String(s) => cast::parse_time(s),
            Value::Int(i) => cast::time_from_unix(*i as f64),
            Value::Float(f) => cast::time_from_unix(*f),
            _ => None,
        }
    }

    /// Coerces a value into a duration.
    ///
    /// Numbers are nanoseconds. Strings are either bare nanoseconds or
    /// unit-suffixed terms such as `1h30m` or `250ms`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use treecfg::domain::Value;
    ///
    /// assert_eq!(Value::from("1m30s").as_duration(), Some(Duration::from_secs(90)));
    /// assert_eq!(Value::from(1_000).as_duration(), Some(Duration::from_micros(1)));
    /// ```
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Int(i) => u64::try_from(*i).ok().map(Duration::from_nanos),
            Value::Float(f) if f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64 => {
                Some(Duration::from_nanos(f.round() as u64))
            }
            Value::String(s) => cast::parse_duration(s),
            _ => None,
        }
    }

    /// Coerces a value into a list of strings.
    ///
    /// Sequence elements without a string form are skipped. A single string is
    /// split on whitespace.
    pub fn as_string_slice(&self) -> Option<Vec<String>> {
        match self {
            Value::Sequence(items) => Some(items.iter().filter_map(Value::as_string).collect()),
            Value::String(s) => Some(s.split_whitespace().map(str::to_string).collect()),
            _ => None,
        }
    }

    /// Returns a copy of a sequence's items.
    pub fn as_slice(&self) -> Option<Vec<Value>> {
        self.as_sequence().map(<[Value]>::to_vec)
    }

    /// Returns a copy of a mapping.
    pub fn as_string_map(&self) -> Option<Mapping> {
        self.as_mapping().cloned()
    }

    /// Converts a mapping into string values, dropping entries without a string form.
    pub fn as_string_map_string(&self) -> Option<BTreeMap<String, String>> {
        self.as_mapping().map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_string().map(|s| (k.clone(), s)))
                .collect()
        })
    }

    /// Converts a sequence of mappings. Fails if any element is not a mapping.
    pub fn as_slice_of_string_maps(&self) -> Option<Vec<Mapping>> {
        self.as_sequence()?
            .iter()
            .map(|item| item.as_mapping().cloned())
            .collect()
    }

    /// Converts a mapping into lists of strings.
    ///
    /// Sequence values become string lists, scalar values become one-element lists.
    pub fn as_string_map_string_slice(&self) -> Option<BTreeMap<String, Vec<String>>> {
        self.as_mapping().map(|m| {
            m.iter()
                .filter_map(|(k, v)| {
                    let list = match v {
                        Value::Sequence(_) => v.as_string_slice(),
                        _ => v.as_string().map(|s| vec![s]),
                    };
                    list.map(|l| (k.clone(), l))
                })
                .collect()
        })
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Mapping(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(feature = "yaml")]
impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Value::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

// YAML allows non-string keys; they are stored under their rendered form.
#[cfg(feature = "yaml")]
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            Value::Sequence(_) | Value::Mapping(_) => {
                let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{}", rendered)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        let json = serde_json::json!({
            "name": "svc",
            "port": 8080,
            "ratio": 0.5,
            "debug": true,
            "hosts": ["a", "b", 3],
            "limits": {"cpu": "2", "mem": 512, "tags": ["x", "y"], "nested": {"k": 1}},
            "routes": [{"path": "/"}, {"path": "/api"}],
            "none": null
        });
        Value::from(json)
    }

    #[test]
    fn test_from_json_preserves_shape() {
        let value = sample();
        assert_eq!(value.get("name"), Some(&Value::from("svc")));
        assert_eq!(value.get("port"), Some(&Value::Int(8080)));
        assert_eq!(value.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(value.get("none"), Some(&Value::Null));
        assert_eq!(value.get("hosts").and_then(Value::as_sequence).map(<[Value]>::len), Some(3));
        assert!(value.get("missing").is_none());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_from_yaml_stringifies_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\nname: x\n").unwrap();
        let value = Value::from(yaml);
        assert_eq!(value.get("1"), Some(&Value::from("one")));
        assert_eq!(value.get("true"), Some(&Value::from("yes")));
        assert_eq!(value.get("name"), Some(&Value::from("x")));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_from_yaml_unwraps_tags() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("v: !custom 5\n").unwrap();
        assert_eq!(Value::from(yaml).get("v"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_as_string() {
        assert_eq!(Value::from("x").as_string(), Some("x".to_string()));
        assert_eq!(Value::from(12).as_string(), Some("12".to_string()));
        assert_eq!(Value::from(1.5).as_string(), Some("1.5".to_string()));
        assert_eq!(Value::from(true).as_string(), Some("true".to_string()));
        assert_eq!(Value::Null.as_string(), None);
        assert_eq!(Value::Sequence(vec![]).as_string(), None);
    }

    #[test]
    fn test_as_numbers() {
        assert_eq!(Value::from("42").as_i64(), Some(42));
        assert_eq!(Value::from(3.7).as_i64(), Some(3));
        assert_eq!(Value::from(true).as_i64(), Some(1));
        assert_eq!(Value::from("nope").as_i64(), None);
        assert_eq!(Value::from(i64::MAX).as_i32(), None);
        assert_eq!(Value::from(7).as_f64(), Some(7.0));
        assert_eq!(Value::from("2.25").as_f64(), Some(2.25));
        assert_eq!(Value::Mapping(Mapping::new()).as_f64(), None);
    }

    #[test]
    fn test_as_duration_and_time() {
        assert_eq!(Value::from("2s").as_duration(), Some(Duration::from_secs(2)));
        assert_eq!(Value::from(-5).as_duration(), None);
        assert!(Value::from("2024-01-02T03:04:05Z").as_time().is_some());
        assert!(Value::from(0).as_time().is_some());
        assert!(Value::from(true).as_time().is_none());
    }

    #[test]
    fn test_collection_coercions() {
        let value = sample();
        assert_eq!(
            value.get("hosts").and_then(Value::as_string_slice),
            Some(vec!["a".to_string(), "b".to_string(), "3".to_string()])
        );
        assert_eq!(
            Value::from("a b  c").as_string_slice(),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );

        let limits = value.get("limits").unwrap();
        let flat = limits.as_string_map_string().unwrap();
        assert_eq!(flat.get("cpu"), Some(&"2".to_string()));
        assert_eq!(flat.get("mem"), Some(&"512".to_string()));
        assert!(!flat.contains_key("tags"));

        let lists = limits.as_string_map_string_slice().unwrap();
        assert_eq!(lists.get("tags"), Some(&vec!["x".to_string(), "y".to_string()]));
        assert_eq!(lists.get("cpu"), Some(&vec!["2".to_string()]));
        assert!(!lists.contains_key("nested"));

        let routes = value.get("routes").and_then(Value::as_slice_of_string_maps).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[1].get("path"), Some(&Value::from("/api")));
        assert!(value.get("hosts").and_then(Value::as_slice_of_string_maps).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("text").to_string(), "text");
        assert_eq!(
            Value::Sequence(vec![Value::from(1), Value::from("a")]).to_string(),
            "[1,\"a\"]"
        );
    }

    #[test]
    fn test_serde_untagged_roundtrip_through_json() {
        let value = sample();
        let json = serde_json::to_value(&value).unwrap();
        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Mapping(Mapping::new()).kind(), "mapping");
    }
}
