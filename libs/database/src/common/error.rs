use thiserror::Error;

/// Errors shared by database connectors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Health check failed: {0}")]
    HealthCheck(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl DatabaseError {
    pub fn connection(details: impl Into<String>) -> Self {
        Self::Connection(details.into())
    }

    pub fn health_check(details: impl Into<String>) -> Self {
        Self::HealthCheck(details.into())
    }
}
