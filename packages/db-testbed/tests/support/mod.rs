#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use db_testbed::{ContainerEndpoint, ContainerLauncher, LaunchedBackend, TestbedError};
use tokio::sync::Notify;

// Logging is auto-installed for every integration test binary
#[ctor::ctor]
fn init_logging() {
    testbed_test_support::test_logging::init();
}

/// Endpoint the launcher doubles hand out.
pub fn sample_endpoint() -> ContainerEndpoint {
    ContainerEndpoint {
        host: "127.0.0.1".to_string(),
        port: 33061,
        database: "test".to_string(),
        username: "root".to_string(),
        password: "hunter2".to_string(),
    }
}

/// Launcher double that succeeds with a canned endpoint and counts how many
/// times it was asked to launch.
pub struct StaticLauncher {
    pub endpoint: ContainerEndpoint,
    pub launches: Arc<AtomicUsize>,
}

impl StaticLauncher {
    pub fn new(endpoint: ContainerEndpoint) -> Self {
        Self {
            endpoint,
            launches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ContainerLauncher for StaticLauncher {
    async fn launch(&self) -> Result<LaunchedBackend, TestbedError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(LaunchedBackend {
            endpoint: self.endpoint.clone(),
            guard: None,
        })
    }
}

/// Launcher double that always fails, the no-runtime-in-reach case.
pub struct FailingLauncher {
    pub reason: String,
    pub launches: Arc<AtomicUsize>,
}

impl FailingLauncher {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
            launches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ContainerLauncher for FailingLauncher {
    async fn launch(&self) -> Result<LaunchedBackend, TestbedError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Err(TestbedError::launch(self.reason.clone()))
    }
}

/// Launcher double that parks inside `launch` until released, so a test can
/// observe the in-flight lifecycle phase.
pub struct GatedLauncher {
    pub endpoint: ContainerEndpoint,
    /// Notified by the launcher once it has entered `launch`.
    pub entered: Arc<Notify>,
    /// Released by the test to let the launch complete.
    pub release: Arc<Notify>,
}

impl GatedLauncher {
    pub fn new(endpoint: ContainerEndpoint) -> Self {
        Self {
            endpoint,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl ContainerLauncher for GatedLauncher {
    async fn launch(&self) -> Result<LaunchedBackend, TestbedError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(LaunchedBackend {
            endpoint: self.endpoint.clone(),
            guard: None,
        })
    }
}
