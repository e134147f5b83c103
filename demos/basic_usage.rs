// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the treecfg crate.
//!
//! This example demonstrates:
//! - Loading a YAML or JSON file into a configuration store
//! - Typed lookups with dotted paths
//! - Zero values for missing keys versus `require`/`get_as`
//! - Decoding a section into a struct
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage -- path/to/config.yaml
//! ```
//!
//! Without an argument a sample document is written to a temporary directory.

use serde::Deserialize;
use std::path::PathBuf;
use treecfg::prelude::*;

const SAMPLE: &str = r#"{
  "app": {"name": "MyApplication", "debug": "true"},
  "database": {"host": "localhost", "port": 5432, "timeout": "1m30s"},
  "servers": ["alpha", "beta"]
}"#;

#[derive(Debug, Deserialize)]
struct Database {
    host: String,
    port: u16,
}

fn sample_path() -> Result<PathBuf> {
    let path = std::env::temp_dir().join("treecfg-basic-usage.json");
    std::fs::write(&path, SAMPLE)?;
    Ok(path)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== treecfg: Basic Usage ===\n");

    let path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => sample_path()?,
    };
    println!("Loading {}\n", path.display());

    let store = ConfigStore::from_file(&path);
    store.read_in_config()?;

    println!("--- Typed lookups ---");
    println!("app.name         = {}", store.get_string("app.name"));
    println!("app.debug        = {}", store.get_bool("app.debug"));
    println!("database.port    = {}", store.get_int("database.port"));
    println!("database.timeout = {:?}", store.get_duration("database.timeout"));
    println!("servers          = {:?}", store.get_string_slice("servers"));

    println!("\n--- Missing keys ---");
    println!("get_int(\"missing.port\") = {}", store.get_int("missing.port"));
    match store.require("missing.port") {
        Ok(value) => println!("require found {}", value),
        Err(e) => println!("require failed: {}", e),
    }

    println!("\n--- Struct decoding ---");
    match store.decode_into::<Database>("database") {
        Ok(db) => println!("{:?}", db),
        Err(e) => println!("decode failed: {}", e),
    }

    Ok(())
}
