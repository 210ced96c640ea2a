use axum::Json;
use axum::Router;
use axum::routing::get;
use mk_core::reference::{CHARSETS, CONTENT_TYPES, STATUS_CODES};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct Banner {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/static/content-types", get(content_types))
        .route("/static/charsets", get(charsets))
        .route("/static/status-codes", get(status_codes))
}

#[utoipa::path(get, path = "/", responses((status = 200, body = Banner)))]
pub(crate) async fn home() -> Json<Banner> {
    Json(Banner {
        name: "mk".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: [
            "GET /static/content-types",
            "GET /static/charsets",
            "GET /static/status-codes",
            "GET /v1/list",
            "POST /v1/new?status=&contentType=&charset=",
            "ANY /v1/{id}?delay=",
            "GET /openapi.json",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    })
}

#[utoipa::path(get, path = "/static/content-types", responses((status = 200, body = Vec<String>)))]
pub(crate) async fn content_types() -> Json<&'static [&'static str]> {
    Json(CONTENT_TYPES)
}

#[utoipa::path(get, path = "/static/charsets", responses((status = 200, body = Vec<String>)))]
pub(crate) async fn charsets() -> Json<&'static [&'static str]> {
    Json(CHARSETS)
}

#[utoipa::path(
    get,
    path = "/static/status-codes",
    responses((status = 200, body = BTreeMap<String, String>))
)]
pub(crate) async fn status_codes() -> Json<BTreeMap<u16, &'static str>> {
    Json(STATUS_CODES.iter().copied().collect())
}
