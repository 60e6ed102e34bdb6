//! Ephemeral database provisioning for test runs.
//!
//! Selects a backend once per process - a containerized MySQL engine when a
//! container runtime is reachable, a shared in-memory SQLite database
//! otherwise - and publishes the datasource properties the surrounding
//! harness consumes. Startup failures never propagate: an unreachable
//! runtime resolves to the fallback with the reason attached, so suites keep
//! running on machines without one.
//!
//! ```no_run
//! use db_testbed::{PropertyRegistry, ProvisioningContext, TestbedConfig};
//!
//! # async fn bootstrap() -> Result<(), db_testbed::TestbedError> {
//! let ctx = ProvisioningContext::new(TestbedConfig::new());
//! ctx.provision().await;
//!
//! let mut registry = PropertyRegistry::new();
//! ctx.publish(&mut registry)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connect;
pub mod error;
pub mod infra;
pub mod properties;

pub use config::intent::{
    resolve_intent, resolve_intent_from, DisableSource, ProvisioningIntent, USE_TESTCONTAINERS_ENV,
};
pub use config::{ContainerScope, TestbedConfig, DEFAULT_MYSQL_TAG};
pub use connect::connect_backend;
pub use error::TestbedError;
pub use infra::backend::{
    BackendHandle, BackendKind, ContainerEndpoint, ContainerLauncher, FallbackCause,
    LaunchedBackend, LifecycleState, MysqlLauncher, Provisioned, ProvisioningContext,
};
pub use properties::PropertyRegistry;
