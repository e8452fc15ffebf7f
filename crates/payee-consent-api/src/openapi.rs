//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented payee routes into one document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payee Consent Broker",
        version = "0.1.0",
        description = "Brokers payee data-access decisions between the banking application, the OAuth token service and the privacy engine.",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::payee::authorize,
        crate::routes::payee::consent,
        crate::routes::payee::store_consents,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::payee::AuthorizeRequest,
        crate::routes::payee::AuthorizeResponse,
        crate::routes::payee::StoreConsentsRequest,
        crate::routes::payee::StoreConsentsResponse,
    )),
    tags(
        (name = "payee", description = "Payee data-access consent"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_payee_route() {
        let doc = ApiDoc::openapi();
        for path in ["/payee/authorize", "/payee/consent", "/payee/consents"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
