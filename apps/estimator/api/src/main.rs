use axum::middleware;
use axum::routing::get;
use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    // Initialize the Prometheus recorder before anything records metrics
    observability::init_metrics();

    // Connect to PostgreSQL with startup retry
    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    // Bring the schema up to date
    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
    }

    let state = AppState::new(db.clone());

    // Domain routers with their state applied, mounted under /api
    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(api_routes).await?;

    // Liveness, readiness, and metrics endpoints sit outside /api
    let app = router
        .merge(health_router(config.app))
        .merge(api::ready_router(state))
        .route("/metrics", get(observability::metrics_handler))
        .layer(middleware::from_fn(
            observability::middleware::metrics_middleware,
        ));

    info!(
        name = config.app.name,
        version = config.app.version,
        "Starting estimator API"
    );

    // Graceful shutdown closes the connection pool
    let cleanup = async move {
        if let Err(e) = db.close().await {
            tracing::warn!("Failed to close database connection: {}", e);
        }
    };

    create_production_app(app, &config.server, Duration::from_secs(30), cleanup).await?;

    Ok(())
}
