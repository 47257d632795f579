//! HTTP handlers for the rates API

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    UuidPath, ValidatedJson,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::entity;
use crate::error::{PricingError, PricingResult};
use crate::models::{
    CloudProvider, CreatePricingRate, Currency, PriceComponent, PricingModel, PricingRate,
    RateFilter, RateSource, ResourcePricing, ResourceType, UpdatePricingRate,
};
use crate::repository::RateRepository;
use crate::service::RateCardService;

/// OpenAPI documentation for the rates API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_rates,
        create_rate,
        get_rate,
        update_rate,
        delete_rate,
        catalog_lookup,
    ),
    components(
        schemas(
            PricingRate,
            CreatePricingRate,
            UpdatePricingRate,
            RateFilter,
            ResourcePricing,
            PriceComponent,
            CloudProvider,
            ResourceType,
            PricingModel,
            Currency,
            RateSource,
            CatalogQuery,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = entity::Model::TAG, description = "Persisted rate store management"),
        (name = "catalog", description = "Built-in rate catalog lookups")
    )
)]
pub struct ApiDoc;

/// Create the rates router with all HTTP endpoints
pub fn router<R: RateRepository + 'static>(service: RateCardService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_rates).post(create_rate))
        .route(
            "/{id}",
            get(get_rate).put(update_rate).delete(delete_rate),
        )
        .route("/catalog/{resource_type}", get(catalog_lookup))
        .with_state(shared_service)
}

/// List rates with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = entity::Model::TAG,
    params(RateFilter),
    responses(
        (status = 200, description = "List of rates", body = Vec<PricingRate>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_rates<R: RateRepository>(
    State(service): State<Arc<RateCardService<R>>>,
    Query(filter): Query<RateFilter>,
) -> PricingResult<Json<Vec<PricingRate>>> {
    let rates = service.list(filter).await?;
    Ok(Json(rates))
}

/// Create a new rate row
#[utoipa::path(
    post,
    path = "",
    tag = entity::Model::TAG,
    request_body = CreatePricingRate,
    responses(
        (status = 201, description = "Rate created successfully", body = PricingRate),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_rate<R: RateRepository>(
    State(service): State<Arc<RateCardService<R>>>,
    ValidatedJson(input): ValidatedJson<CreatePricingRate>,
) -> PricingResult<impl IntoResponse> {
    let rate = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(rate)))
}

/// Get a rate row by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Rate ID")
    ),
    responses(
        (status = 200, description = "Rate found", body = PricingRate),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_rate<R: RateRepository>(
    State(service): State<Arc<RateCardService<R>>>,
    UuidPath(id): UuidPath,
) -> PricingResult<Json<PricingRate>> {
    let rate = service.get_by_id(id).await?;
    Ok(Json(rate))
}

/// Update a rate row
#[utoipa::path(
    put,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Rate ID")
    ),
    request_body = UpdatePricingRate,
    responses(
        (status = 200, description = "Rate updated successfully", body = PricingRate),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_rate<R: RateRepository>(
    State(service): State<Arc<RateCardService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdatePricingRate>,
) -> PricingResult<Json<PricingRate>> {
    let rate = service.update(id, input).await?;
    Ok(Json(rate))
}

/// Delete a rate row
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = entity::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Rate ID")
    ),
    responses(
        (status = 204, description = "Rate deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_rate<R: RateRepository>(
    State(service): State<Arc<RateCardService<R>>>,
    UuidPath(id): UuidPath,
) -> PricingResult<impl IntoResponse> {
    if !service.delete(id).await? {
        return Err(PricingError::NotFound(id.to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Query parameters for catalog lookups
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct CatalogQuery {
    /// Cloud provider (defaults to aws)
    #[serde(default)]
    pub provider: CloudProvider,
    /// Region code
    #[serde(default = "default_region")]
    pub region: String,
    /// Variant discriminator (instance size, volume type, ...)
    pub variant: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Look up the built-in catalog rate card for a resource type
#[utoipa::path(
    get,
    path = "/catalog/{resource_type}",
    tag = "catalog",
    params(
        ("resource_type" = ResourceType, Path, description = "Resource type"),
        CatalogQuery
    ),
    responses(
        (status = 200, description = "Rate card", body = ResourcePricing),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn catalog_lookup<R: RateRepository>(
    State(service): State<Arc<RateCardService<R>>>,
    Path(resource_type): Path<ResourceType>,
    Query(query): Query<CatalogQuery>,
) -> PricingResult<Json<ResourcePricing>> {
    let pricing = service.catalog_lookup(
        query.provider,
        resource_type,
        &query.region,
        query.variant.as_deref(),
    )?;
    Ok(Json(pricing))
}
