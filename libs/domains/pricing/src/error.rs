use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur in the pricing domain
#[derive(Debug, Error)]
pub enum PricingError {
    /// Rate not found
    #[error("Rate not found: {0}")]
    NotFound(String),

    /// Duplicate rate row
    #[error("Duplicate rate: {0}")]
    Duplicate(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No rate table exists for the provider/resource type pair
    #[error("No rate table for {provider} {resource_type}")]
    UnsupportedLookup {
        provider: String,
        resource_type: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PricingError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            PricingError::Duplicate(_) => (StatusCode::CONFLICT, self.to_string()),
            PricingError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            PricingError::UnsupportedLookup { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            PricingError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            PricingError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}
