// SPDX-License-Identifier: MIT OR Apache-2.0

//! Watches a configuration file and reloads the store on every change.
//!
//! To run this example:
//! ```bash
//! cargo run --example watch_file --features reload -- path/to/config.yaml
//! ```
//!
//! Edit the file while the example runs; it stops after 60 seconds.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use treecfg::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: watch_file <config file>");
        std::process::exit(2);
    };

    let backend = FileBackend::new(&path);
    let store = Arc::new(ConfigStore::new(backend.clone()));
    store.read_in_config()?;
    println!("Loaded {} top-level keys from {}", store.snapshot().len(), path);

    let reloader = Arc::clone(&store);
    let mut watcher = backend.watch(Arc::new(move |mapping: Mapping| {
        println!("File changed ({} top-level keys)", mapping.len());
        if let Err(e) = reloader.read_in_config() {
            eprintln!("Reload failed: {}", e);
        }
    }))?;

    thread::sleep(Duration::from_secs(60));
    watcher.stop()?;
    println!("Finished after {} loads", store.version());
    Ok(())
}
