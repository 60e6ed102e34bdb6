use thiserror::Error;

/// Errors surfaced by the testbed's fallible surfaces.
///
/// Container start failures are deliberately not part of the provisioning
/// API: the provisioner turns them into the in-memory fallback and keeps the
/// reason as data. `Launch` only travels across the launcher seam itself.
#[derive(Debug, Error)]
pub enum TestbedError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Container launch failed: {reason}")]
    Launch { reason: String },

    #[error("Datasource properties requested before provisioning resolved")]
    PublishBeforeProvision,

    #[error("Database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

impl TestbedError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn launch(reason: impl Into<String>) -> Self {
        Self::Launch {
            reason: reason.into(),
        }
    }
}
