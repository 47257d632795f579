//! HTTP handlers for the estimation API

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnprocessableEntityResponse,
    },
    UuidPath, ValidatedJson,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

use domain_pricing::{CloudProvider, RateRepository};

use crate::entity;
use crate::error::{EstimationError, EstimationResult};
use crate::models::{
    CostComponent, CostEstimate, CreateHiddenDependencyRule, EstimateArchitectureRequest,
    EstimateDuration, EstimatePeriod, EstimateResourceRequest, HiddenDependency,
    HiddenDependencyCost, HiddenDependencyRule, QuantityFormula, ResourceDescriptor,
    RuleCondition,
};
use crate::repository::HiddenDependencyRuleRepository;
use crate::service::EstimationService;

/// OpenAPI documentation for the estimation API
#[derive(OpenApi)]
#[openapi(
    paths(
        estimate_resource,
        estimate_architecture,
        list_rules,
        create_rule,
        delete_rule,
    ),
    components(
        schemas(
            EstimateResourceRequest,
            EstimateArchitectureRequest,
            ResourceDescriptor,
            CostEstimate,
            CostComponent,
            HiddenDependencyCost,
            EstimatePeriod,
            HiddenDependency,
            HiddenDependencyRule,
            CreateHiddenDependencyRule,
            QuantityFormula,
            RuleCondition,
            RuleFilter,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnprocessableEntityResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "Cost estimation endpoints"),
        (name = "rules", description = "Hidden dependency rule administration")
    )
)]
pub struct ApiDoc;

/// Create the estimation router with all HTTP endpoints
pub fn router<R, S>(service: EstimationService<R, S>) -> Router
where
    R: RateRepository + 'static,
    S: HiddenDependencyRuleRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/resource", post(estimate_resource))
        .route("/architecture", post(estimate_architecture))
        .route("/rules", get(list_rules).post(create_rule))
        .route("/rules/{id}", axum::routing::delete(delete_rule))
        .with_state(shared_service)
}

/// Estimate the cost of a single resource, including its hidden
/// dependencies
#[utoipa::path(
    post,
    path = "/resource",
    tag = entity::Model::TAG,
    request_body = EstimateResourceRequest,
    responses(
        (status = 200, description = "Itemized cost estimate", body = CostEstimate),
        (status = 400, response = BadRequestValidationResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn estimate_resource<R, S>(
    State(service): State<Arc<EstimationService<R, S>>>,
    ValidatedJson(request): ValidatedJson<EstimateResourceRequest>,
) -> EstimationResult<Json<CostEstimate>>
where
    R: RateRepository,
    S: HiddenDependencyRuleRepository,
{
    let duration = EstimateDuration::from_hours(request.duration_hours);
    let estimate = service
        .estimate_resource(&request.resource, duration)
        .await?;
    Ok(Json(estimate))
}

/// Estimate the cost of a whole architecture.
///
/// Resources that cannot be priced are skipped; the estimate covers the
/// remainder.
#[utoipa::path(
    post,
    path = "/architecture",
    tag = entity::Model::TAG,
    request_body = EstimateArchitectureRequest,
    responses(
        (status = 200, description = "Combined cost estimate", body = CostEstimate),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn estimate_architecture<R, S>(
    State(service): State<Arc<EstimationService<R, S>>>,
    ValidatedJson(request): ValidatedJson<EstimateArchitectureRequest>,
) -> EstimationResult<Json<CostEstimate>>
where
    R: RateRepository,
    S: HiddenDependencyRuleRepository,
{
    let duration = EstimateDuration::from_hours(request.duration_hours);
    let estimate = service
        .estimate_architecture(&request.resources, duration)
        .await?;
    Ok(Json(estimate))
}

/// Query parameters for listing rules
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct RuleFilter {
    /// Narrow to one provider
    pub provider: Option<CloudProvider>,
}

/// List persisted hidden-dependency rules
#[utoipa::path(
    get,
    path = "/rules",
    tag = "rules",
    params(RuleFilter),
    responses(
        (status = 200, description = "Persisted rules", body = Vec<HiddenDependencyRule>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_rules<R, S>(
    State(service): State<Arc<EstimationService<R, S>>>,
    Query(filter): Query<RuleFilter>,
) -> EstimationResult<Json<Vec<HiddenDependencyRule>>>
where
    R: RateRepository,
    S: HiddenDependencyRuleRepository,
{
    let rules = service.list_rules(filter.provider).await?;
    Ok(Json(rules))
}

/// Persist a hidden-dependency rule.
///
/// A persisted rule suppresses the built-in rule for the same parent and
/// child types.
#[utoipa::path(
    post,
    path = "/rules",
    tag = "rules",
    request_body = CreateHiddenDependencyRule,
    responses(
        (status = 201, description = "Rule created", body = HiddenDependencyRule),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_rule<R, S>(
    State(service): State<Arc<EstimationService<R, S>>>,
    ValidatedJson(input): ValidatedJson<CreateHiddenDependencyRule>,
) -> EstimationResult<impl IntoResponse>
where
    R: RateRepository,
    S: HiddenDependencyRuleRepository,
{
    if input.parent_resource_type == input.child_resource_type {
        return Err(EstimationError::InvalidInput(
            "A resource type cannot be its own hidden dependency".to_string(),
        ));
    }

    let rule = service.create_rule(input).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Delete a persisted hidden-dependency rule
#[utoipa::path(
    delete,
    path = "/rules/{id}",
    tag = "rules",
    params(
        ("id" = Uuid, Path, description = "Rule ID")
    ),
    responses(
        (status = 204, description = "Rule deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_rule<R, S>(
    State(service): State<Arc<EstimationService<R, S>>>,
    UuidPath(id): UuidPath,
) -> EstimationResult<impl IntoResponse>
where
    R: RateRepository,
    S: HiddenDependencyRuleRepository,
{
    if !service.delete_rule(id).await? {
        return Err(EstimationError::RuleNotFound(id.to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
