//! Opening a sea-orm connection against the provisioned backend.

use std::future::Future;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::error::TestbedError;
use crate::infra::backend::handle::{BackendHandle, BackendKind};

const CONTAINER_CONNECT_ATTEMPTS: u32 = 5;
const CONTAINER_CONNECT_INTERVAL: Duration = Duration::from_millis(500);

/// Connect to the backend described by `handle`.
///
/// The container path retries on a fixed interval: the engine's port opens
/// slightly before authentication is ready, so the first attempt can lose
/// the race even though the container reported healthy. The in-memory path
/// connects directly.
pub async fn connect_backend(handle: &BackendHandle) -> Result<DatabaseConnection, TestbedError> {
    let mut options = ConnectOptions::new(&handle.url);
    options
        .min_connections(1)
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    match handle.kind {
        BackendKind::MysqlContainer => {
            retry_connection(
                || {
                    let options = options.clone();
                    async move { Database::connect(options).await.map_err(TestbedError::from) }
                },
                CONTAINER_CONNECT_ATTEMPTS,
                CONTAINER_CONNECT_INTERVAL,
            )
            .await
        }
        BackendKind::SqliteMemory => Database::connect(options)
            .await
            .map_err(TestbedError::from),
    }
}

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval: Duration,
) -> Result<T, TestbedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TestbedError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempts = attempt, "database connection succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                last_error = Some(err);
                if attempt < max_attempts {
                    warn!(
                        attempt,
                        max_attempts,
                        interval_ms = interval.as_millis() as u64,
                        "database connection failed, retrying"
                    );
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        TestbedError::config("no error recorded after max attempts (this should not happen)")
    }))
}
