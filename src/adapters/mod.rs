// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing backend and decoder implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: format decoders for configuration documents, the local file
//! backend and the prefix-based distributed backend with its etcd store.

pub mod distributed;
#[cfg(feature = "etcd")]
pub mod etcd;
pub mod file;
pub mod json;
#[cfg(feature = "yaml")]
pub mod yaml;

pub mod watchers;

pub use distributed::DistributedBackend;
#[cfg(feature = "etcd")]
pub use etcd::{EtcdBackend, EtcdOptions, EtcdStore};
pub use file::FileBackend;
pub use json::JsonDecoder;
#[cfg(feature = "reload")]
pub use watchers::FileWatcher;
#[cfg(feature = "yaml")]
pub use yaml::YamlDecoder;
