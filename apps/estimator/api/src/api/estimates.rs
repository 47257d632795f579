use axum::Router;
use domain_estimation::{handlers, EstimationService, PgHiddenDependencyRuleRepository};
use domain_pricing::PgRateRepository;
use std::sync::Arc;

pub fn router(state: &crate::state::AppState) -> Router {
    let rates = Arc::new(PgRateRepository::new(state.db.clone()));
    let rules = Arc::new(PgHiddenDependencyRuleRepository::new(state.db.clone()));
    let service = EstimationService::new(rates, rules);
    handlers::router(service)
}
