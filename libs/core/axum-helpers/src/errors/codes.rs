//! Type-safe error codes for API responses.
//!
//! Single source of truth for error codes used across the platform. Each
//! code carries a string form for clients (e.g. "VALIDATION_ERROR"), an
//! integer for logging/monitoring, and a default human-readable message.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Invalid UUID format in path or query parameter
    InvalidUuid,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// Request conflicts with current resource state
    Conflict,

    /// Request payload is semantically incorrect
    UnprocessableEntity,

    /// The cloud provider is not supported by the estimation engine
    UnsupportedProvider,

    /// The resource type has no pricing strategy or rate table
    UnsupportedResourceType,

    /// A hard-required metadata field was absent
    MissingRequiredMetadata,

    // Server errors (5000-5999)
    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable
    ServiceUnavailable,

    // Database errors (2000-2999)
    /// Database connection or query error
    DatabaseError,

    /// Database migration error
    MigrationError,
}

impl ErrorCode {
    /// String identifier consumed by clients
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidUuid => "INVALID_UUID",
            ErrorCode::JsonExtraction => "JSON_EXTRACTION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            ErrorCode::UnsupportedProvider => "UNSUPPORTED_PROVIDER",
            ErrorCode::UnsupportedResourceType => "UNSUPPORTED_RESOURCE_TYPE",
            ErrorCode::MissingRequiredMetadata => "MISSING_REQUIRED_METADATA",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::MigrationError => "MIGRATION_ERROR",
        }
    }

    /// Integer code for logging and monitoring
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidUuid => 1002,
            ErrorCode::JsonExtraction => 1003,
            ErrorCode::NotFound => 1004,
            ErrorCode::Conflict => 1005,
            ErrorCode::UnprocessableEntity => 1006,
            ErrorCode::UnsupportedProvider => 1101,
            ErrorCode::UnsupportedResourceType => 1102,
            ErrorCode::MissingRequiredMetadata => 1103,
            ErrorCode::DatabaseError => 2001,
            ErrorCode::MigrationError => 2002,
            ErrorCode::InternalError => 5001,
            ErrorCode::ServiceUnavailable => 5002,
        }
    }

    /// Default human-readable message
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Request validation failed",
            ErrorCode::InvalidUuid => "Invalid UUID format",
            ErrorCode::JsonExtraction => "Invalid JSON in request body",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::Conflict => "Resource already exists",
            ErrorCode::UnprocessableEntity => "Request could not be processed",
            ErrorCode::UnsupportedProvider => "Cloud provider is not supported",
            ErrorCode::UnsupportedResourceType => "Resource type is not supported",
            ErrorCode::MissingRequiredMetadata => "A required metadata field is missing",
            ErrorCode::InternalError => "An internal server error occurred",
            ErrorCode::ServiceUnavailable => "Service is temporarily unavailable",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::MigrationError => "Database migration error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_forms() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(
            ErrorCode::UnsupportedResourceType.as_str(),
            "UNSUPPORTED_RESOURCE_TYPE"
        );
    }

    #[test]
    fn test_error_code_integers_are_unique() {
        let codes = [
            ErrorCode::ValidationError,
            ErrorCode::InvalidUuid,
            ErrorCode::JsonExtraction,
            ErrorCode::NotFound,
            ErrorCode::Conflict,
            ErrorCode::UnprocessableEntity,
            ErrorCode::UnsupportedProvider,
            ErrorCode::UnsupportedResourceType,
            ErrorCode::MissingRequiredMetadata,
            ErrorCode::InternalError,
            ErrorCode::ServiceUnavailable,
            ErrorCode::DatabaseError,
            ErrorCode::MigrationError,
        ];

        let mut seen = std::collections::HashSet::new();
        for code in codes {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }
}
