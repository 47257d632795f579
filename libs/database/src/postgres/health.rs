use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use std::time::Instant;
use tracing::{debug, warn};

use crate::common::DatabaseError;

/// Check PostgreSQL connectivity by executing a trivial query.
///
/// Used by the `/ready` endpoint; returns the round-trip latency on success.
pub async fn check_health(db: &DatabaseConnection) -> Result<u128, DatabaseError> {
    let start = Instant::now();

    let result = db
        .execute_raw(Statement::from_string(
            db.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await;

    match result {
        Ok(_) => {
            let elapsed = start.elapsed().as_millis();
            debug!(latency_ms = elapsed, "PostgreSQL health check passed");
            Ok(elapsed)
        }
        Err(e) => {
            warn!("PostgreSQL health check failed: {}", e);
            Err(DatabaseError::health_check(e.to_string()))
        }
    }
}
