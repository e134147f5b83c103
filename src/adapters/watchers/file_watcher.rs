// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system watcher for configuration file changes.
//!
//! This module provides a watcher that monitors a configuration file, re-decodes
//! it after modifications settle and hands the new mapping to a callback.

use crate::adapters::FileBackend;
use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeCallback, ConfigBackend, ConfigWatcher};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// File system watcher for configuration files.
///
/// Events for the file are debounced: the file is re-decoded once no further
/// events have arrived for the debounce delay, so a burst of writes produces a
/// single callback with the final content. Decode failures are logged and the
/// callback is skipped until the file becomes valid again.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use treecfg::adapters::{FileBackend, FileWatcher};
/// use treecfg::domain::Mapping;
/// use treecfg::ports::ConfigWatcher;
///
/// # fn main() -> treecfg::domain::Result<()> {
/// let mut watcher = FileWatcher::new(FileBackend::new("/path/to/config.yaml"), None)?;
///
/// watcher.watch(Arc::new(|mapping: Mapping| {
///     println!("Configuration changed: {} keys", mapping.len());
/// }))?;
///
/// // Later, stop watching
/// watcher.stop()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileWatcher {
    /// Backend used to re-decode the file
    backend: FileBackend,
    /// Debounce delay (default 500ms)
    debounce_delay: Duration,
    /// Internal watcher
    watcher: Option<RecommendedWatcher>,
    /// Thread handle for the watcher thread
    watch_thread: Option<JoinHandle<()>>,
    /// Stop signal sender
    stop_tx: Option<Sender<()>>,
}

impl FileWatcher {
    /// Creates a new watcher for the backend's file.
    ///
    /// # Arguments
    ///
    /// * `backend` - The file backend to re-read on changes
    /// * `debounce_delay` - Optional debounce delay (default 500ms)
    pub fn new(backend: FileBackend, debounce_delay: Option<Duration>) -> Result<Self> {
        if !backend.file_path().exists() {
            return Err(ConfigError::WatcherError {
                message: format!("File does not exist: {}", backend.file_path().display()),
                source: None,
            });
        }

        Ok(Self {
            backend,
            debounce_delay: debounce_delay.unwrap_or(DEFAULT_DEBOUNCE),
            watcher: None,
            watch_thread: None,
            stop_tx: None,
        })
    }

    /// Returns `true` while the background thread is running.
    pub fn is_watching(&self) -> bool {
        self.watch_thread.is_some()
    }

    fn watch_dir(&self) -> Result<PathBuf> {
        let path = self
            .backend
            .file_path()
            .canonicalize()
            .map_err(|e| ConfigError::WatcherError {
                message: format!("Failed to resolve {}", self.backend.file_path().display()),
                source: Some(Box::new(e)),
            })?;
        path.parent()
            .map(|p| p.to_path_buf())
            .ok_or_else(|| ConfigError::WatcherError {
                message: "Failed to get parent directory".to_string(),
                source: None,
            })
    }
}

fn run_watch_loop(
    backend: FileBackend,
    debounce_delay: Duration,
    event_rx: Receiver<notify::Result<Event>>,
    stop_rx: Receiver<()>,
    callback: ChangeCallback,
) {
    let file_name: Option<OsString> = backend.file_path().file_name().map(|n| n.to_os_string());
    let mut pending: Option<Instant> = None;

    loop {
        if !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty)) {
            break;
        }

        match event_rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) => {
                let relevant = (event.kind.is_modify() || event.kind.is_create())
                    && event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if relevant {
                    pending = Some(Instant::now());
                }
            }
            Ok(Err(e)) => tracing::warn!("File watcher error: {}", e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Some(last_event) = pending {
            if last_event.elapsed() >= debounce_delay {
                pending = None;
                match backend.produce() {
                    Ok(mapping) => {
                        tracing::debug!(
                            "Reloaded {} after change",
                            backend.file_path().display()
                        );
                        callback(mapping);
                    }
                    Err(e) => tracing::warn!(
                        "Ignoring change to {}: {}",
                        backend.file_path().display(),
                        e
                    ),
                }
            }
        }
    }
}

fn watcher_error(message: String, err: notify::Error) -> ConfigError {
    ConfigError::WatcherError {
        message,
        source: Some(Box::new(err)),
    }
}

impl ConfigWatcher for FileWatcher {
    fn watch(&mut self, callback: ChangeCallback) -> Result<()> {
        if self.is_watching() {
            return Err(ConfigError::WatcherError {
                message: format!("Already watching {}", self.backend.file_path().display()),
                source: None,
            });
        }

        // Editors often replace the file rather than write it, so watch its directory
        let dir = self.watch_dir()?;
        let (event_tx, event_rx) = channel();
        let mut notifier = RecommendedWatcher::new(event_tx, notify::Config::default())
            .map_err(|e| watcher_error(format!("Cannot create notifier: {}", e), e))?;
        notifier
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| watcher_error(format!("Cannot watch {}: {}", dir.display(), e), e))?;

        let (stop_tx, stop_rx) = channel();
        let backend = self.backend.clone();
        let delay = self.debounce_delay;
        self.watch_thread = Some(thread::spawn(move || {
            run_watch_loop(backend, delay, event_rx, stop_rx, callback)
        }));
        self.watcher = Some(notifier);
        self.stop_tx = Some(stop_tx);

        tracing::info!("Watching {}", self.backend.file_path().display());
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if let Some(tx) = self.stop_tx.take() {
            tx.send(()).ok();
        }
        // Dropping the notifier disconnects the event channel as well
        self.watcher = None;

        let Some(handle) = self.watch_thread.take() else {
            return Ok(());
        };
        handle.join().map_err(|_| ConfigError::WatcherError {
            message: "Watch thread panicked".to_string(),
            source: None,
        })?;
        tracing::info!("Stopped watching {}", self.backend.file_path().display());
        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mapping, Value};
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::Builder;

    fn json_file(content: &str) -> tempfile::NamedTempFile {
        let file = Builder::new().suffix(".json").tempfile().unwrap();
        fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_file_watcher_new() {
        let file = json_file("{}");
        assert!(FileWatcher::new(FileBackend::new(file.path()), None).is_ok());
    }

    #[test]
    fn test_file_watcher_nonexistent_file() {
        let watcher = FileWatcher::new(FileBackend::new("/nonexistent/path/config.json"), None);
        assert!(matches!(watcher, Err(ConfigError::WatcherError { .. })));
    }

    #[test]
    fn test_file_watcher_watch_and_stop() {
        let file = json_file("{}");
        let mut watcher = FileWatcher::new(FileBackend::new(file.path()), None).unwrap();

        assert!(watcher.watch(Arc::new(|_mapping: Mapping| {})).is_ok());
        assert!(watcher.is_watching());
        assert!(watcher.stop().is_ok());
        assert!(!watcher.is_watching());
        // Stopping twice is harmless
        assert!(watcher.stop().is_ok());
    }

    #[test]
    fn test_file_watcher_double_watch() {
        let file = json_file("{}");
        let mut watcher = FileWatcher::new(FileBackend::new(file.path()), None).unwrap();
        let callback: ChangeCallback = Arc::new(|_mapping: Mapping| {});

        assert!(watcher.watch(callback.clone()).is_ok());
        assert!(watcher.watch(callback).is_err());

        watcher.stop().unwrap();
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_file_watcher_delivers_new_mapping() {
        let file = json_file(r#"{"v": 1}"#);
        let path = file.path().to_path_buf();
        let mut watcher =
            FileWatcher::new(FileBackend::new(&path), Some(Duration::from_millis(50))).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        watcher
            .watch(Arc::new(move |mapping: Mapping| {
                seen_clone.lock().unwrap().push(mapping);
            }))
            .unwrap();

        thread::sleep(Duration::from_millis(100));
        fs::write(&path, r#"{"v": 2}"#).unwrap();
        for _ in 0..30 {
            if !seen.lock().unwrap().is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }

        watcher.stop().unwrap();

        let seen = seen.lock().unwrap();
        let last = seen.last().expect("watcher delivered no mapping");
        assert_eq!(last.get("v"), Some(&Value::from(2)));
    }

    #[test]
    fn test_file_watcher_custom_debounce() {
        let file = json_file("{}");
        let watcher =
            FileWatcher::new(FileBackend::new(file.path()), Some(Duration::from_secs(1))).unwrap();
        assert_eq!(watcher.debounce_delay, Duration::from_secs(1));
    }
}
