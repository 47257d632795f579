use axum::Router;

pub mod estimates;
pub mod health;
pub mod rates;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
///
/// Takes a reference to AppState and initializes all services. Returns a
/// stateless Router (sub-routers have their state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest(
            domain_pricing::entity::Model::URL,
            rates::router(state),
        )
        .nest(
            domain_estimation::entity::Model::URL,
            estimates::router(state),
        )
}

/// Creates a router with the /ready endpoint performing real dependency
/// checks. Mergeable with the stateless app router from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
