//! Testbed configuration - intent resolution and provisioning knobs.

pub mod intent;

/// Engine image tag pinned by default so every run provisions the same
/// server version regardless of what `latest` currently points at.
pub const DEFAULT_MYSQL_TAG: &str = "8.0.33";

/// Lifetime policy for a successfully started container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerScope {
    /// Leave the engine running when the process exits so later runs can
    /// reattach instead of paying the startup cost again. The container
    /// handle is intentionally leaked; the runtime owns cleanup.
    #[default]
    Reused,
    /// Tie the engine to this run: the container is stopped and removed when
    /// the provisioning context is dropped.
    PerRun,
}

/// Configuration for one provisioning run.
///
/// The defaults match what suites want day to day: containers enabled, the
/// pinned engine tag, reuse across runs. Everything is overridable through
/// the builder-style `with_` methods.
#[derive(Debug, Clone)]
pub struct TestbedConfig {
    use_testcontainers_override: Option<String>,
    mysql_tag: String,
    scope: ContainerScope,
}

impl TestbedConfig {
    pub fn new() -> Self {
        Self {
            use_testcontainers_override: None,
            mysql_tag: DEFAULT_MYSQL_TAG.to_string(),
            scope: ContainerScope::default(),
        }
    }

    /// Process-level stand-in for the `USE_TESTCONTAINERS` environment
    /// variable, for callers that cannot reach the environment. Consulted
    /// only when the variable is absent.
    pub fn with_use_testcontainers(mut self, value: impl Into<String>) -> Self {
        self.use_testcontainers_override = Some(value.into());
        self
    }

    /// Pin a different engine tag.
    pub fn with_mysql_tag(mut self, tag: impl Into<String>) -> Self {
        self.mysql_tag = tag.into();
        self
    }

    pub fn with_scope(mut self, scope: ContainerScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn use_testcontainers_override(&self) -> Option<&str> {
        self.use_testcontainers_override.as_deref()
    }

    pub fn mysql_tag(&self) -> &str {
        &self.mysql_tag
    }

    pub fn scope(&self) -> ContainerScope {
        self.scope
    }
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self::new()
    }
}
