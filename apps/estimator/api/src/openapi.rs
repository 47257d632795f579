use utoipa::OpenApi;

/// Combined OpenAPI documentation for the estimator API.
///
/// Domain ApiDocs are nested under their mount paths so the rendered
/// docs mirror the actual routing.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cloud Cost Estimator API",
        description = "Itemized cost estimation for cloud resources and architectures, \
                       including implicitly provisioned (hidden) dependencies.",
    ),
    nest(
        (path = "/api/rates", api = domain_pricing::handlers::ApiDoc),
        (path = "/api/estimates", api = domain_estimation::handlers::ApiDoc),
    )
)]
pub struct ApiDoc;
