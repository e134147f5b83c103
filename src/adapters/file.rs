// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local file configuration backend.
//!
//! This module provides a backend that reads a configuration file and decodes it
//! with the decoder matching the file's extension.

use crate::adapters::JsonDecoder;
#[cfg(feature = "yaml")]
use crate::adapters::YamlDecoder;
use crate::domain::{ConfigError, Mapping, Result};
use crate::ports::{ConfigBackend, FormatDecoder};
use directories::ProjectDirs;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum allowed size for configuration files (10MB)
const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "file";

/// Configuration backend for local files.
///
/// The decoder is chosen by file extension: `.json` always, `.yaml` and `.yml`
/// with the `yaml` feature, plus any decoder registered with
/// [`with_decoder`](FileBackend::with_decoder). Any other extension fails with
/// [`ConfigError::UnsupportedFormat`]. The file is read afresh on every
/// [`produce`](ConfigBackend::produce).
///
/// # Examples
///
/// ```rust,no_run
/// use treecfg::adapters::FileBackend;
/// use treecfg::ports::ConfigBackend;
///
/// let backend = FileBackend::new("/etc/myapp/config.yaml");
/// let mapping = backend.produce().unwrap();
/// ```
#[derive(Clone)]
pub struct FileBackend {
    /// Path to the configuration file
    file_path: PathBuf,
    /// Registered decoders, searched in order
    decoders: Vec<Arc<dyn FormatDecoder>>,
}

impl FileBackend {
    /// Creates a backend for the given file with the built-in decoders.
    ///
    /// The file is not touched until the first `produce`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        #[allow(unused_mut)]
        let mut decoders: Vec<Arc<dyn FormatDecoder>> = vec![Arc::new(JsonDecoder::new())];
        #[cfg(feature = "yaml")]
        decoders.push(Arc::new(YamlDecoder::new()));

        Self {
            file_path: path.as_ref().to_path_buf(),
            decoders,
        }
    }

    /// Creates a backend for a file in the OS-appropriate configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    /// * `filename` - The configuration file name (e.g., "config.yaml")
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use treecfg::adapters::FileBackend;
    ///
    /// let backend = FileBackend::from_default_location("myapp", "com.example", "config.yaml").unwrap();
    /// ```
    pub fn from_default_location(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Ok(Self::new(proj_dirs.config_dir().join(filename)))
    }

    /// Registers an additional decoder.
    ///
    /// Decoders registered later take precedence over earlier ones, including
    /// the built-in decoders, for the extensions they support.
    pub fn with_decoder(mut self, decoder: impl FormatDecoder + 'static) -> Self {
        self.decoders.insert(0, Arc::new(decoder));
        self
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the extension of the configuration file, or `""` if it has none.
    pub fn extension(&self) -> &str {
        self.file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    }

    fn decoder(&self) -> Result<&dyn FormatDecoder> {
        let extension = self.extension();
        self.decoders
            .iter()
            .find(|decoder| decoder.supports(extension))
            .map(|decoder| &**decoder)
            .ok_or_else(|| ConfigError::UnsupportedFormat {
                path: self.display_name(),
                extension: extension.to_string(),
            })
    }

    fn display_name(&self) -> String {
        self.file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unknown>")
            .to_string()
    }

    fn read_content(&self) -> Result<String> {
        // Check file size before reading to avoid loading huge files
        let metadata = fs::metadata(&self.file_path).map_err(|e| {
            ConfigError::source(
                SOURCE_NAME,
                format!("Failed to read file metadata: {}", self.display_name()),
                e,
            )
        })?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_CONFIG_FILE_SIZE
                ),
                source: None,
            });
        }

        let bytes = fs::read(&self.file_path).map_err(|e| {
            ConfigError::source(
                SOURCE_NAME,
                format!("Failed to read configuration file: {}", self.display_name()),
                e,
            )
        })?;
        String::from_utf8(bytes).map_err(|e| ConfigError::ParseError {
            message: format!("{} is not valid UTF-8: {}", self.display_name(), e),
            source: Some(Box::new(e)),
        })
    }

    /// Starts watching the file and calls `callback` with each re-decoded mapping.
    ///
    /// The returned watcher runs in the background until it is stopped or dropped.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use treecfg::adapters::FileBackend;
    /// use treecfg::domain::Mapping;
    /// use treecfg::ports::ConfigWatcher;
    ///
    /// # fn main() -> treecfg::domain::Result<()> {
    /// let backend = FileBackend::new("/etc/myapp/config.yaml");
    /// let mut watcher = backend.watch(Arc::new(|mapping: Mapping| {
    ///     println!("reloaded {} top-level keys", mapping.len());
    /// }))?;
    ///
    /// watcher.stop()?;
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "reload")]
    pub fn watch(
        &self,
        callback: crate::ports::ChangeCallback,
    ) -> Result<crate::adapters::FileWatcher> {
        use crate::ports::ConfigWatcher;

        let mut watcher = crate::adapters::FileWatcher::new(self.clone(), None)?;
        watcher.watch(callback)?;
        Ok(watcher)
    }
}

impl fmt::Debug for FileBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extensions: Vec<&str> = self
            .decoders
            .iter()
            .flat_map(|d| d.supported_extensions().iter().copied())
            .collect();
        f.debug_struct("FileBackend")
            .field("file_path", &self.file_path)
            .field("extensions", &extensions)
            .finish()
    }
}

impl ConfigBackend for FileBackend {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn produce(&self) -> Result<Mapping> {
        let decoder = self.decoder()?;
        let content = self.read_content()?;
        let mapping = decoder.decode(&content)?;
        tracing::debug!(
            "Decoded {} top-level keys from {}",
            mapping.len(),
            self.file_path.display()
        );
        Ok(mapping)
    }
}
