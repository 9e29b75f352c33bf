use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "Cost Observability API",
        version = "0.1.0",
        description = "Multi-tenant Kubernetes cost observability: ingest, allocation, and right-sizing recommendations"
    ),
    servers((url = "/api", description = "API base path")),
    nest(
        (path = "/v1/admin/api_keys", api = domain_apikeys::handlers::ApiDoc),
        (path = "/v1/ingest", api = domain_timeseries::handlers::ApiDoc),
        (path = "/v1/allocation", api = domain_allocation::handlers::ApiDoc),
        (path = "/v1/recommendations", api = domain_recommender::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
