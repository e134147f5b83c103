// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! Every fallible operation in the crate returns [`ConfigError`]. Typed getters on
//! the store never surface these errors; they fall back to zero values instead.

use thiserror::Error;

/// The main error type for configuration operations.
///
/// This enum is marked as `#[non_exhaustive]` to allow for future additions
/// without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use treecfg::domain::errors::ConfigError;
///
/// fn lookup() -> Result<String, ConfigError> {
///     Err(ConfigError::ConfigKeyNotFound {
///         key: "database.host".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested configuration path is not present in the snapshot.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The path that was not found
        key: String,
    },

    /// A backend failed to produce a mapping.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the backend that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A document could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The file extension does not select any known decoder.
    #[error("Unsupported configuration format '{extension}' for file {path}")]
    UnsupportedFormat {
        /// The file that was rejected
        path: String,
        /// The extension found on the file (empty when there was none)
        extension: String,
    },

    /// A value could not be decoded into the requested structure.
    #[error("Failed to decode configuration at '{key}': {source}")]
    DecodeError {
        /// The path that was decoded (empty for the whole snapshot)
        key: String,
        /// The underlying decoding error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error occurred in a configuration watcher.
    #[error("Configuration watcher error: {message}")]
    WatcherError {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `SourceError` that wraps an underlying error.
    pub fn source<E>(source_name: &str, message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::SourceError {
            source_name: source_name.to_string(),
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates a `DecodeError` for the given path.
    pub fn decode<E>(key: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::DecodeError {
            key: key.to_string(),
            source: Box::new(err),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
