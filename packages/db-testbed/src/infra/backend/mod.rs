pub mod handle;
pub mod launcher;
pub mod provisioner;

pub use handle::{mysql_url, sanitize_url, BackendHandle, BackendKind};
pub use launcher::{ContainerEndpoint, ContainerLauncher, LaunchedBackend, MysqlLauncher};
pub use provisioner::{FallbackCause, LifecycleState, Provisioned, ProvisioningContext};
