// SPDX-License-Identifier: MIT OR Apache-2.0

//! etcd key-value store adapter.
//!
//! This module provides [`EtcdStore`], a [`KeyTreeStore`] over an etcd cluster,
//! and the [`EtcdBackend`] that loads configured prefixes from it.

use crate::adapters::DistributedBackend;
use crate::domain::{ConfigError, KeyNode, Result};
use crate::ports::KeyTreeStore;
use etcd_client::{
    Certificate, Client, ConnectOptions, GetOptions, Identity, SortOrder, SortTarget, TlsOptions,
};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::Runtime;

const SOURCE_NAME: &str = "etcd";

/// Default timeout applied to each request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
/// Default timeout for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default keep-alive interval for idle connections.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Backend that loads key prefixes from etcd.
pub type EtcdBackend = DistributedBackend<EtcdStore>;

/// Connection settings for an etcd cluster.
///
/// Settings are fixed once the client is connected.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use treecfg::adapters::EtcdOptions;
///
/// let options = EtcdOptions::new(["https://etcd-0:2379", "https://etcd-1:2379"])
///     .with_prefix("/myapp/config")
///     .with_ca_cert("/etc/ssl/etcd-ca.pem")
///     .with_client_cert("/etc/ssl/client.pem", "/etc/ssl/client-key.pem")
///     .with_basic_auth("reader", "secret")
///     .with_request_timeout(Duration::from_secs(5));
///
/// assert_eq!(options.endpoints.len(), 2);
/// assert_eq!(options.prefixes, vec!["/myapp/config".to_string()]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct EtcdOptions {
    /// Cluster endpoints
    pub endpoints: Vec<String>,
    /// Key prefixes to load
    pub prefixes: Vec<String>,
    /// PEM client certificate path, used together with `key`
    pub cert: Option<PathBuf>,
    /// PEM client private key path, used together with `cert`
    pub key: Option<PathBuf>,
    /// PEM CA bundle path
    pub ca_cert: Option<PathBuf>,
    /// Username and password for basic authentication
    pub credentials: Option<(String, String)>,
    /// Timeout applied to each request
    pub request_timeout: Duration,
    /// Timeout for establishing a connection
    pub connect_timeout: Duration,
    /// Keep-alive interval
    pub keep_alive: Duration,
}

impl EtcdOptions {
    /// Creates options for the given endpoints with default timeouts.
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            endpoints: endpoints.into_iter().map(|s| s.as_ref().to_string()).collect(),
            prefixes: Vec::new(),
            cert: None,
            key: None,
            ca_cert: None,
            credentials: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            keep_alive: DEFAULT_KEEP_ALIVE,
        }
    }

    /// Adds a key prefix to load.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Sets the client certificate and key used for mutual TLS.
    pub fn with_client_cert(mut self, cert: impl AsRef<Path>, key: impl AsRef<Path>) -> Self {
        self.cert = Some(cert.as_ref().to_path_buf());
        self.key = Some(key.as_ref().to_path_buf());
        self
    }

    /// Sets the CA bundle used to verify the cluster.
    pub fn with_ca_cert(mut self, ca_cert: impl AsRef<Path>) -> Self {
        self.ca_cert = Some(ca_cert.as_ref().to_path_buf());
        self
    }

    /// Enables basic authentication.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns `true` if any TLS material is configured.
    pub fn uses_tls(&self) -> bool {
        self.ca_cert.is_some() || (self.cert.is_some() && self.key.is_some())
    }

    fn tls_options(&self) -> Result<Option<TlsOptions>> {
        if !self.uses_tls() {
            return Ok(None);
        }

        let mut tls = TlsOptions::new();
        if let Some(ca_cert) = &self.ca_cert {
            tls = tls.ca_certificate(Certificate::from_pem(read_pem(ca_cert)?));
        }
        if let (Some(cert), Some(key)) = (&self.cert, &self.key) {
            tls = tls.identity(Identity::from_pem(read_pem(cert)?, read_pem(key)?));
        }
        Ok(Some(tls))
    }

    fn connect_options(&self) -> Result<ConnectOptions> {
        let mut options = ConnectOptions::new()
            .with_timeout(self.request_timeout)
            .with_connect_timeout(self.connect_timeout)
            .with_keep_alive(self.keep_alive, self.request_timeout);

        if let Some((username, password)) = &self.credentials {
            options = options.with_user(username.clone(), password.clone());
        }
        if let Some(tls) = self.tls_options()? {
            options = options.with_tls(tls);
        }
        Ok(options)
    }
}

// Keep the password out of logs
impl fmt::Debug for EtcdOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EtcdOptions")
            .field("endpoints", &self.endpoints)
            .field("prefixes", &self.prefixes)
            .field("cert", &self.cert)
            .field("key", &self.key)
            .field("ca_cert", &self.ca_cert)
            .field("username", &self.credentials.as_ref().map(|(user, _)| user))
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("keep_alive", &self.keep_alive)
            .finish()
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        ConfigError::source(
            SOURCE_NAME,
            format!("Failed to read TLS material from {}", path.display()),
            e,
        )
    })
}

/// A [`KeyTreeStore`] backed by an etcd v3 cluster.
///
/// The store owns a tokio runtime and blocks on it for every request, so it
/// must be used from synchronous code, not from inside another tokio runtime.
pub struct EtcdStore {
    /// etcd client
    client: Client,
    /// Endpoints the client was connected with
    endpoints: Vec<String>,
    /// Runtime driving the client
    runtime: Runtime,
}

impl EtcdStore {
    /// Connects to the cluster described by `options`.
    ///
    /// Fails if TLS material cannot be read or the client cannot be created.
    pub fn connect(options: &EtcdOptions) -> Result<Self> {
        let connect_options = options.connect_options()?;

        let runtime = Runtime::new().map_err(|e| {
            ConfigError::source(SOURCE_NAME, "Failed to create tokio runtime", e)
        })?;

        let client = runtime
            .block_on(Client::connect(&options.endpoints, Some(connect_options)))
            .map_err(|e| {
                ConfigError::source(SOURCE_NAME, format!("Failed to connect to etcd: {}", e), e)
            })?;

        tracing::debug!("Connected to etcd at {:?}", options.endpoints);
        Ok(Self {
            client,
            endpoints: options.endpoints.clone(),
            runtime,
        })
    }

    /// Returns the endpoints this store is connected to.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

impl fmt::Debug for EtcdStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EtcdStore")
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl KeyTreeStore for EtcdStore {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn list_tree(&self, prefix: &str) -> Result<Option<KeyNode>> {
        let mut client = self.client.clone();
        // Linearizable reads are the default, which gives quorum consistency
        let options = GetOptions::new()
            .with_prefix()
            .with_sort(SortTarget::Key, SortOrder::Ascend);

        let response = self
            .runtime
            .block_on(client.get(prefix, Some(options)))
            .map_err(|e| {
                ConfigError::source(
                    SOURCE_NAME,
                    format!("Failed to list keys under '{}': {}", prefix, e),
                    e,
                )
            })?;

        if response.kvs().is_empty() {
            return Ok(None);
        }

        let mut pairs = Vec::with_capacity(response.kvs().len());
        for kv in response.kvs() {
            match (kv.key_str(), kv.value_str()) {
                (Ok(key), Ok(value)) => pairs.push((key.to_string(), value.to_string())),
                _ => tracing::warn!("Skipping non UTF-8 etcd entry under '{}'", prefix),
            }
        }

        // A byte-prefix range also matches sibling keys such as `/cfg-old`
        let root = KeyNode::from_listing(prefix, pairs);
        if root.value.is_none() && root.nodes.is_empty() {
            return Ok(None);
        }
        Ok(Some(root))
    }
}

impl DistributedBackend<EtcdStore> {
    /// Connects to etcd and creates a backend for the configured prefixes.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use treecfg::adapters::{EtcdBackend, EtcdOptions};
    /// use treecfg::service::ConfigStore;
    ///
    /// # fn main() -> treecfg::domain::Result<()> {
    /// let backend = EtcdBackend::connect(
    ///     EtcdOptions::new(["http://127.0.0.1:2379"]).with_prefix("/myapp"),
    /// )?;
    /// let store = ConfigStore::new(backend);
    /// store.read_in_config()?;
    ///
    /// // Leaf keys are flat, so the full etcd key is a single path segment
    /// let host = store.get_string("/myapp/db/host");
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(options: EtcdOptions) -> Result<Self> {
        let store = EtcdStore::connect(&options)?;
        Ok(DistributedBackend::new(store, options.prefixes))
    }
}
