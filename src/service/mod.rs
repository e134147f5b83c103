// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer holding the configuration store.

pub mod config_store;

pub use config_store::{ConfigStore, ConfigStoreBuilder};
