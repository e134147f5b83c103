// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loads key prefixes from etcd and prints the flattened keys.
//!
//! To run this example:
//! ```bash
//! etcdctl put /myapp/db/host localhost
//! etcdctl put /myapp/db/port 5432
//! cargo run --example etcd_prefixes --features etcd -- http://127.0.0.1:2379 /myapp
//! ```

use treecfg::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let mut args = std::env::args().skip(1);
    let endpoint = args
        .next()
        .unwrap_or_else(|| "http://127.0.0.1:2379".to_string());
    let prefixes: Vec<String> = args.collect();
    let prefixes = if prefixes.is_empty() {
        vec!["/myapp".to_string()]
    } else {
        prefixes
    };

    let mut options = EtcdOptions::new([endpoint]);
    for prefix in &prefixes {
        options = options.with_prefix(prefix.as_str());
    }

    let store = ConfigStore::new(EtcdBackend::connect(options)?);
    store.read_in_config()?;

    for (key, value) in store.snapshot().iter() {
        println!("{} = {}", key, value);
    }

    // Flattened keys are looked up whole
    if let Some(first) = store.snapshot().keys().next() {
        println!("\nget_string({:?}) = {}", first, store.get_string(first));
    }
    Ok(())
}
