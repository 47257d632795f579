//! Handler tests for the estimation domain.
//!
//! These verify the HTTP surface end to end against in-memory stores:
//! - request deserialization and validation
//! - response serialization and status codes
//! - the engine wiring behind the router
//!
//! Unlike full-app tests, only the estimation router is mounted here.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_estimation::*;
use domain_pricing::InMemoryRateRepository;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use test_utils::{assert_close, TestDataBuilder};
use tower::ServiceExt; // for oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> axum::Router {
    let rates = Arc::new(InMemoryRateRepository::new());
    let rules = Arc::new(InMemoryHiddenDependencyRuleRepository::new());
    let service = EstimationService::new(rates, rules);
    handlers::router(service)
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_estimate_resource_returns_200_with_breakdown() {
    let builder = TestDataBuilder::from_test_name("estimate_gateway");

    let request = post_json(
        "/resource",
        json!({
            "resource": {
                "id": builder.resource_id("gateway"),
                "name": builder.name("gateway", "edge"),
                "resource_type": "nat_gateway",
                "provider": "aws",
                "region": "us-east-1",
                "metadata": {}
            },
            "duration_hours": 720.0
        }),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let estimate: CostEstimate = json_body(response.into_body()).await;
    // 32.40 gateway + 3.60 hidden floating IP
    assert_close(estimate.total_cost, 36.0, COST_EPSILON, "gateway total");
    assert_eq!(estimate.period, EstimatePeriod::Monthly);
    assert_eq!(estimate.breakdown.len(), 1);
    assert_eq!(estimate.hidden_dependency_costs.len(), 1);
}

#[tokio::test]
async fn test_estimate_resource_coerces_numeric_metadata_strings() {
    let builder = TestDataBuilder::from_test_name("estimate_volume_strings");

    let request = post_json(
        "/resource",
        json!({
            "resource": {
                "id": builder.resource_id("volume"),
                "name": builder.name("volume", "data"),
                "resource_type": "block_volume",
                "provider": "aws",
                "region": "us-east-1",
                "metadata": { "size_gb": "100" }
            },
            "duration_hours": 720.0
        }),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let estimate: CostEstimate = json_body(response.into_body()).await;
    assert_close(estimate.total_cost, 8.0, COST_EPSILON, "volume total");
}

#[tokio::test]
async fn test_estimate_resource_missing_size_returns_400() {
    let builder = TestDataBuilder::from_test_name("estimate_volume_missing");

    let request = post_json(
        "/resource",
        json!({
            "resource": {
                "id": builder.resource_id("volume"),
                "name": builder.name("volume", "data"),
                "resource_type": "block_volume",
                "provider": "aws",
                "region": "us-east-1",
                "metadata": {}
            },
            "duration_hours": 720.0
        }),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_estimate_resource_unsupported_provider_returns_422() {
    let builder = TestDataBuilder::from_test_name("estimate_cloudflare");

    let request = post_json(
        "/resource",
        json!({
            "resource": {
                "id": builder.resource_id("vm"),
                "name": builder.name("vm", "edge"),
                "resource_type": "compute_instance",
                "provider": "cloudflare",
                "region": "us-east-1",
                "metadata": {}
            },
            "duration_hours": 1.0
        }),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_estimate_resource_rejects_non_positive_duration() {
    let builder = TestDataBuilder::from_test_name("estimate_bad_duration");

    let request = post_json(
        "/resource",
        json!({
            "resource": {
                "id": builder.resource_id("ip"),
                "name": builder.name("ip", "edge"),
                "resource_type": "floating_ip",
                "provider": "aws",
                "region": "us-east-1",
                "metadata": {}
            },
            "duration_hours": 0.0
        }),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_estimate_architecture_skips_unsupported_resource() {
    let builder = TestDataBuilder::from_test_name("estimate_architecture");

    let request = post_json(
        "/architecture",
        json!({
            "resources": [
                {
                    "id": builder.resource_id("ip-1"),
                    "name": builder.name("ip", "one"),
                    "resource_type": "floating_ip",
                    "provider": "aws",
                    "region": "us-east-1",
                    "metadata": {}
                },
                {
                    "id": builder.resource_id("broken"),
                    "name": builder.name("volume", "broken"),
                    "resource_type": "block_volume",
                    "provider": "aws",
                    "region": "us-east-1",
                    "metadata": {}
                },
                {
                    "id": builder.resource_id("ip-2"),
                    "name": builder.name("ip", "two"),
                    "resource_type": "floating_ip",
                    "provider": "aws",
                    "region": "us-east-1",
                    "metadata": { "attached": true }
                }
            ],
            "duration_hours": 720.0
        }),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let estimate: CostEstimate = json_body(response.into_body()).await;
    // unattached IP 3.60 + attached IP 0.0; broken volume skipped
    assert_close(estimate.total_cost, 3.60, COST_EPSILON, "architecture total");
    // both successful IPs contribute a line, the attached one at zero
    assert_eq!(estimate.breakdown.len(), 2);
    assert!(estimate.resource_type.is_none());
    assert!(estimate.provider.is_none());
}

#[tokio::test]
async fn test_estimate_architecture_requires_resources() {
    let request = post_json(
        "/architecture",
        json!({
            "resources": [],
            "duration_hours": 1.0
        }),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rules_crud_roundtrip() {
    let app = app();

    // create
    let create = post_json(
        "/rules",
        json!({
            "provider": "aws",
            "parent_resource_type": "compute_instance",
            "child_resource_type": "block_volume",
            "quantity": { "kind": "fixed", "value": 100.0 },
            "is_attached": false,
            "description": "Tenant policy volume"
        }),
    );
    let response = app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let rule: HiddenDependencyRule = json_body(response.into_body()).await;

    // list
    let list = Request::builder()
        .method("GET")
        .uri("/rules?provider=aws")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(list).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rules: Vec<HiddenDependencyRule> = json_body(response.into_body()).await;
    assert_eq!(rules.len(), 1);

    // delete
    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/rules/{}", rule.id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // delete again -> 404
    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/rules/{}", rule.id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_persisted_rule_changes_estimate() {
    let rates = Arc::new(InMemoryRateRepository::new());
    let rules = Arc::new(InMemoryHiddenDependencyRuleRepository::new());
    let service = EstimationService::new(rates, rules);
    let app = handlers::router(service);

    let builder = TestDataBuilder::from_test_name("persisted_rule_estimate");

    // override the built-in root volume rule with a 100 GB fixed size
    let create = post_json(
        "/rules",
        json!({
            "provider": "aws",
            "parent_resource_type": "compute_instance",
            "child_resource_type": "block_volume",
            "quantity": { "kind": "fixed", "value": 100.0 },
            "is_attached": false,
            "description": "Tenant policy volume"
        }),
    );
    let response = app.clone().oneshot(create).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let estimate_request = post_json(
        "/resource",
        json!({
            "resource": {
                "id": builder.resource_id("vm"),
                "name": builder.name("vm", "web"),
                "resource_type": "compute_instance",
                "provider": "aws",
                "region": "us-east-1",
                "metadata": {}
            },
            "duration_hours": 720.0
        }),
    );
    let response = app.oneshot(estimate_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let estimate: CostEstimate = json_body(response.into_body()).await;
    let volume = estimate
        .hidden_dependency_costs
        .iter()
        .find(|h| h.resource_type == domain_pricing::ResourceType::BlockVolume)
        .unwrap();
    // 100 GB x 0.08/GB-month instead of the 8 GB default
    assert_close(volume.total_cost, 8.0, COST_EPSILON, "policy volume cost");
}

#[tokio::test]
async fn test_same_resource_estimates_identically_twice() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("determinism");

    let payload = json!({
        "resource": {
            "id": builder.resource_id("db"),
            "name": builder.name("db", "orders"),
            "resource_type": "managed_database",
            "provider": "aws",
            "region": "us-east-1",
            "metadata": {
                "allocated_storage_gb": 50,
                "backup_retention_days": 7
            }
        },
        "duration_hours": 720.0
    });

    let first = app
        .clone()
        .oneshot(post_json("/resource", payload.clone()))
        .await
        .unwrap();
    let second = app
        .oneshot(post_json("/resource", payload))
        .await
        .unwrap();

    let first: CostEstimate = json_body(first.into_body()).await;
    let second: CostEstimate = json_body(second.into_body()).await;

    assert_close(
        first.total_cost,
        second.total_cost,
        COST_EPSILON,
        "deterministic totals",
    );
    assert_eq!(
        first.hidden_dependency_costs.len(),
        second.hidden_dependency_costs.len()
    );
    // hidden children carry deterministic ids derived from the parent
    assert_eq!(first.hidden_dependency_costs.len(), 2);
}
