use crate::routes::mocks::NewMockOutput;
use crate::routes::reference::Banner;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use mk_core::types::{MockId, MockRecord, MockRecordSummary};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::reference::home,
        crate::routes::reference::content_types,
        crate::routes::reference::charsets,
        crate::routes::reference::status_codes,
        crate::routes::mocks::list_mocks,
        crate::routes::mocks::new_mock,
        crate::routes::mocks::find_mock
    ),
    components(schemas(MockId, MockRecord, MockRecordSummary, NewMockOutput, Banner))
)]
struct ApiDoc;

pub fn generate_spec() -> String {
    ApiDoc::openapi()
        .to_pretty_json()
        .unwrap_or_else(|_| "{}".to_string())
}

pub fn router() -> Router {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
