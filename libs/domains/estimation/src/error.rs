use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain_pricing::{CloudProvider, ResourceType};
use serde_json::json;
use thiserror::Error;

/// Result type for estimation operations
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Errors that can occur in the estimation domain.
///
/// Rate-store and rule-store failures never surface here: the resolver
/// chain degrades to its next tier with a warning instead.
#[derive(Debug, Error)]
pub enum EstimationError {
    /// The resource's provider is not supported by the engine
    #[error("Unsupported cloud provider: {0}")]
    UnsupportedProvider(CloudProvider),

    /// No strategy or rate table resolves the resource type
    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(ResourceType),

    /// A hard-required metadata field is absent (no default exists)
    #[error("Missing required metadata field '{field}' for {resource_type}")]
    MissingRequiredMetadata {
        resource_type: ResourceType,
        field: &'static str,
    },

    /// Rule not found
    #[error("Hidden dependency rule not found: {0}")]
    RuleNotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EstimationError {
    /// Stable label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            EstimationError::UnsupportedProvider(_) => "unsupported_provider",
            EstimationError::UnsupportedResourceType(_) => "unsupported_resource_type",
            EstimationError::MissingRequiredMetadata { .. } => "missing_required_metadata",
            EstimationError::RuleNotFound(_) => "rule_not_found",
            EstimationError::InvalidInput(_) => "invalid_input",
            EstimationError::Database(_) => "database",
            EstimationError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for EstimationError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            EstimationError::UnsupportedProvider(_)
            | EstimationError::UnsupportedResourceType(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            EstimationError::MissingRequiredMetadata { .. }
            | EstimationError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            EstimationError::RuleNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            EstimationError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            EstimationError::Internal(_) => (
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
