//! Datasource property publication.
//!
//! The consuming harness reads its datasource settings from a key/value
//! registry. Values are registered as zero-argument suppliers and evaluated
//! when the datasource layer asks, never earlier; registration itself only
//! happens after the provisioner reached a terminal state, so a supplier can
//! never observe a half-started backend.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::infra::backend::handle::BackendHandle;
use crate::infra::backend::provisioner::Provisioned;

/// Property keys consumed by the harness datasource layer.
pub mod keys {
    pub const DATASOURCE_URL: &str = "datasource.url";
    pub const DATASOURCE_USERNAME: &str = "datasource.username";
    pub const DATASOURCE_PASSWORD: &str = "datasource.password";
    /// Registered for the in-memory fallback only.
    pub const DATASOURCE_DRIVER: &str = "datasource.driver-class-name";
    /// Registered for the in-memory fallback only.
    pub const SCHEMA_DDL_AUTO: &str = "schema.ddl-auto";
}

type Supplier = Box<dyn Fn() -> String + Send + Sync>;

/// Key-to-deferred-value registry.
///
/// Inserting an existing key replaces its supplier; iteration follows the
/// keys' lexicographic order.
#[derive(Default)]
pub struct PropertyRegistry {
    entries: BTreeMap<String, Supplier>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deferred value for `key`.
    pub fn add<F>(&mut self, key: impl Into<String>, supplier: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.entries.insert(key.into(), Box::new(supplier));
    }

    /// Evaluate the supplier registered for `key`.
    pub fn resolve(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|supplier| supplier())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every supplier into an eager map, mainly for assertions and
    /// debugging output.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(key, supplier)| (key.clone(), supplier()))
            .collect()
    }
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Suppliers are opaque; show the keys only.
        f.debug_struct("PropertyRegistry")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Register the property set for a resolved backend: the three connection
/// keys when the container is running, the five-key in-memory set otherwise.
/// The two sets never mix.
pub(crate) fn register_backend_properties(outcome: &Provisioned, registry: &mut PropertyRegistry) {
    match outcome {
        Provisioned::Running(handle) => {
            let handle = Arc::new(handle.clone());
            register_connection_suppliers(&handle, registry);
            debug!(keys = 3usize, "published container datasource properties");
        }
        Provisioned::Fallback { handle, .. } => {
            let handle = Arc::new(handle.clone());
            register_connection_suppliers(&handle, registry);

            let driver = Arc::clone(&handle);
            registry.add(keys::DATASOURCE_DRIVER, move || {
                driver.driver.clone().unwrap_or_default()
            });
            let ddl_auto = Arc::clone(&handle);
            registry.add(keys::SCHEMA_DDL_AUTO, move || {
                ddl_auto.ddl_auto.clone().unwrap_or_default()
            });
            debug!(keys = 5usize, "published in-memory datasource properties");
        }
    }
}

fn register_connection_suppliers(handle: &Arc<BackendHandle>, registry: &mut PropertyRegistry) {
    let url = Arc::clone(handle);
    registry.add(keys::DATASOURCE_URL, move || url.url.clone());
    let username = Arc::clone(handle);
    registry.add(keys::DATASOURCE_USERNAME, move || username.username.clone());
    let password = Arc::clone(handle);
    registry.add(keys::DATASOURCE_PASSWORD, move || password.password.clone());
}
