//! Backend lifecycle: the provision-once context and its outcome types.
//!
//! One [`ProvisioningContext`] is created at harness bootstrap and threaded
//! to every consumer. The first `provision()` call resolves the backend;
//! every later call, from any task, observes the same resolution. A failed
//! container start is not an error of this API - it resolves to the
//! in-memory fallback with the reason carried as data, because suites must
//! keep running on machines without a container runtime.

use std::any::Any;
use std::sync::atomic::{AtomicU8, Ordering};

use tokio::sync::OnceCell;
use tracing::info;

use crate::config::intent::{resolve_intent, DisableSource, ProvisioningIntent};
use crate::config::TestbedConfig;
use crate::error::TestbedError;
use crate::infra::backend::handle::{sanitize_url, BackendHandle, BackendKind};
use crate::infra::backend::launcher::{ContainerLauncher, LaunchedBackend, MysqlLauncher};
use crate::properties::{register_backend_properties, PropertyRegistry};

/// Provisioning lifecycle. `Running` and `Fallback` are terminal; there is
/// no path back to `NotStarted` within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NotStarted,
    Starting,
    Running,
    Fallback,
}

const PHASE_NOT_STARTED: u8 = 0;
const PHASE_STARTING: u8 = 1;
const PHASE_RUNNING: u8 = 2;
const PHASE_FALLBACK: u8 = 3;

/// Why the in-memory engine was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackCause {
    /// The operator disabled containers outright.
    Disabled(DisableSource),
    /// The container start was attempted and failed; the reason is kept for
    /// inspection and logging.
    StartFailed(String),
}

/// The provisioner's resolved outcome. The fallback path is first-class data
/// rather than a swallowed error, so harness code can branch on it and log
/// why a run ended up in-memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned {
    Running(BackendHandle),
    Fallback {
        handle: BackendHandle,
        cause: FallbackCause,
    },
}

impl Provisioned {
    /// The authoritative handle, whichever way the run resolved.
    pub fn handle(&self) -> &BackendHandle {
        match self {
            Self::Running(handle) => handle,
            Self::Fallback { handle, .. } => handle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }
}

struct Resolution {
    outcome: Provisioned,
    // Live container guard when the scope ties the engine to this run.
    _container: Option<Box<dyn Any + Send + Sync>>,
}

/// Owns the lifecycle state and the authoritative backend handle for one
/// test run.
pub struct ProvisioningContext {
    config: TestbedConfig,
    launcher: Box<dyn ContainerLauncher>,
    phase: AtomicU8,
    resolved: OnceCell<Resolution>,
}

impl ProvisioningContext {
    /// Context backed by the real MySQL launcher.
    pub fn new(config: TestbedConfig) -> Self {
        let launcher = Box::new(MysqlLauncher::from_config(&config));
        Self::with_launcher(config, launcher)
    }

    /// Context with a custom launcher: the seam for alternative runtimes and
    /// for exercising fallback handling in tests.
    pub fn with_launcher(config: TestbedConfig, launcher: Box<dyn ContainerLauncher>) -> Self {
        Self {
            config,
            launcher,
            phase: AtomicU8::new(PHASE_NOT_STARTED),
            resolved: OnceCell::new(),
        }
    }

    /// Select and start the backend, once.
    ///
    /// Infallible by contract: a disabled run, a missing runtime, an image
    /// pull error or any other start failure resolves to
    /// [`Provisioned::Fallback`] instead of propagating. Concurrent callers
    /// wait for the first one to reach a terminal state; later calls return
    /// the cached resolution without re-running anything. No extra timeout
    /// is imposed beyond what the container start itself enforces.
    pub async fn provision(&self) -> &Provisioned {
        let resolution = self
            .resolved
            .get_or_init(|| async { self.resolve().await })
            .await;
        &resolution.outcome
    }

    async fn resolve(&self) -> Resolution {
        let intent = resolve_intent(self.config.use_testcontainers_override());

        let ProvisioningIntent::Disabled(source) = intent else {
            return self.start_container().await;
        };

        self.phase.store(PHASE_FALLBACK, Ordering::SeqCst);
        info!("containers disabled, using the in-memory fallback");
        Resolution {
            outcome: Provisioned::Fallback {
                handle: BackendHandle::in_memory_fallback(),
                cause: FallbackCause::Disabled(source),
            },
            _container: None,
        }
    }

    async fn start_container(&self) -> Resolution {
        self.phase.store(PHASE_STARTING, Ordering::SeqCst);

        match self.launcher.launch().await {
            Ok(LaunchedBackend { endpoint, guard }) => {
                let url = endpoint.url();
                let handle = BackendHandle {
                    kind: BackendKind::MysqlContainer,
                    url,
                    username: endpoint.username,
                    password: endpoint.password,
                    driver: None,
                    ddl_auto: None,
                };
                self.phase.store(PHASE_RUNNING, Ordering::SeqCst);
                info!(url = %sanitize_url(&handle.url), "mysql container started");
                Resolution {
                    outcome: Provisioned::Running(handle),
                    _container: guard,
                }
            }
            Err(err) => {
                let reason = err.to_string();
                self.phase.store(PHASE_FALLBACK, Ordering::SeqCst);
                info!(%reason, "container start failed, using the in-memory fallback");
                Resolution {
                    outcome: Provisioned::Fallback {
                        handle: BackendHandle::in_memory_fallback(),
                        cause: FallbackCause::StartFailed(reason),
                    },
                    _container: None,
                }
            }
        }
    }

    /// Current lifecycle phase. `Starting` is only observable while a launch
    /// attempt is in flight.
    pub fn state(&self) -> LifecycleState {
        match self.phase.load(Ordering::SeqCst) {
            PHASE_STARTING => LifecycleState::Starting,
            PHASE_RUNNING => LifecycleState::Running,
            PHASE_FALLBACK => LifecycleState::Fallback,
            _ => LifecycleState::NotStarted,
        }
    }

    /// The resolved handle, or `None` before `provision()` completed.
    pub fn handle(&self) -> Option<&BackendHandle> {
        self.resolved.get().map(|r| r.outcome.handle())
    }

    /// Register the datasource properties for the resolved backend.
    ///
    /// Calling this before `provision()` reached a terminal state is an
    /// integration bug; it fails loudly instead of guessing a default.
    /// Publishing twice re-registers the same suppliers, which is harmless.
    pub fn publish(&self, registry: &mut PropertyRegistry) -> Result<(), TestbedError> {
        let Some(resolution) = self.resolved.get() else {
            return Err(TestbedError::PublishBeforeProvision);
        };
        register_backend_properties(&resolution.outcome, registry);
        Ok(())
    }
}
