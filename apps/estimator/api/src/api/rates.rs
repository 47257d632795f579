use axum::Router;
use domain_pricing::{handlers, PgRateRepository, RateCardService};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgRateRepository::new(state.db.clone());
    let service = RateCardService::new(repository);
    handlers::router(service)
}
