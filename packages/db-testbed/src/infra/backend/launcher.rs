//! Container launch seam.
//!
//! [`ContainerLauncher`] abstracts "start the engine and report where it
//! listens" so the provisioner's fallback handling can be exercised without
//! a container runtime in reach. [`MysqlLauncher`] is the real
//! implementation on top of testcontainers.

use std::any::Any;

use async_trait::async_trait;
use testcontainers_modules::mysql::Mysql;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::testcontainers::{ImageExt, ReuseDirective};
use tracing::debug;

use crate::config::{ContainerScope, TestbedConfig};
use crate::error::TestbedError;
use crate::infra::backend::handle::mysql_url;

/// Engine-side port the MySQL server listens on inside the container.
const MYSQL_PORT: u16 = 3306;

/// Where a launched engine listens and which account it negotiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEndpoint {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl ContainerEndpoint {
    pub fn url(&self) -> String {
        mysql_url(
            &self.username,
            &self.password,
            &self.host,
            self.port,
            &self.database,
        )
    }
}

/// A successfully launched backend: the endpoint plus, for per-run scoping,
/// the live container guard. Dropping the guard tears the engine down.
pub struct LaunchedBackend {
    pub endpoint: ContainerEndpoint,
    pub guard: Option<Box<dyn Any + Send + Sync>>,
}

/// Starts the containerized engine.
///
/// Implementations report failure through [`TestbedError::Launch`]; the
/// provisioner converts any such failure into the in-memory fallback rather
/// than letting it propagate.
#[async_trait]
pub trait ContainerLauncher: Send + Sync {
    async fn launch(&self) -> Result<LaunchedBackend, TestbedError>;
}

/// Real launcher: a pinned-tag MySQL container.
pub struct MysqlLauncher {
    tag: String,
    scope: ContainerScope,
}

impl MysqlLauncher {
    pub fn from_config(config: &TestbedConfig) -> Self {
        Self {
            tag: config.mysql_tag().to_string(),
            scope: config.scope(),
        }
    }
}

#[async_trait]
impl ContainerLauncher for MysqlLauncher {
    async fn launch(&self) -> Result<LaunchedBackend, TestbedError> {
        let request = Mysql::default().with_tag(self.tag.clone());

        let container = match self.scope {
            ContainerScope::Reused => request.with_reuse(ReuseDirective::Always),
            ContainerScope::PerRun => request,
        }
        .start()
        .await
        .map_err(|e| TestbedError::launch(e.to_string()))?;

        let host = container
            .get_host()
            .await
            .map_err(|e| TestbedError::launch(e.to_string()))?
            .to_string();
        let port = container
            .get_host_port_ipv4(MYSQL_PORT)
            .await
            .map_err(|e| TestbedError::launch(e.to_string()))?;

        // The MySQL module provisions a root account with an empty password
        // and a ready-made `test` database.
        let endpoint = ContainerEndpoint {
            host,
            port,
            database: "test".to_string(),
            username: "root".to_string(),
            password: String::new(),
        };

        debug!(
            host = %endpoint.host,
            port = endpoint.port,
            tag = %self.tag,
            "mysql container responding"
        );

        let guard: Option<Box<dyn Any + Send + Sync>> = match self.scope {
            // Reuse is the point: the engine must outlive this process so
            // the next run reattaches instead of re-initializing. Dropping
            // the handle would stop the container, so it is leaked on
            // purpose and the runtime keeps ownership.
            ContainerScope::Reused => {
                std::mem::forget(container);
                None
            }
            ContainerScope::PerRun => Some(Box::new(container)),
        };

        Ok(LaunchedBackend { endpoint, guard })
    }
}
