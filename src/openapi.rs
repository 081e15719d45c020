//! OpenAPI description of the HTTP surface.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::handlers::create_customer,
        crate::handlers::list_customers,
    ),
    components(schemas(
        crate::model::Customer,
        crate::model::CustomerPayload,
        crate::model::DocumentType,
    )),
    tags(
        (name = "customers", description = "Customer records"),
        (name = "ops", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
