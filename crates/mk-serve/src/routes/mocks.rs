use crate::AppState;
use crate::middleware::correlation::CorrelationId;
use crate::response::render;
use crate::routes::error::map_error;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::{Extension, Json, Router};
use mk_core::types::{MockId, MockRecordSummary};
use mk_core::MockError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewMockOutput {
    pub id: MockId,
}

#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DelayQuery {
    /// Artificial latency such as `250ms` or `2s`, capped by the server maximum.
    pub delay: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/list", get(list_mocks))
        .route("/v1/new", post(new_mock))
        .route("/v1/{id}", any(find_mock))
        .with_state(state)
}

const DELAY_PARAM: &str = "delay";

/// Groups repeated query keys, keeping their order.
fn group_params(pairs: Vec<(String, String)>) -> HashMap<String, Vec<String>> {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in pairs {
        params.entry(name).or_default().push(value);
    }
    params
}

/// First `delay` value wins; later repeats are ignored.
fn first_delay(pairs: &[(String, String)]) -> Option<&str> {
    pairs
        .iter()
        .find(|(name, _)| name == DELAY_PARAM)
        .map(|(_, value)| value.as_str())
}

#[utoipa::path(
    get,
    path = "/v1/list",
    responses((status = 200, body = Vec<MockRecordSummary>))
)]
pub(crate) async fn list_mocks(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
) -> Response {
    match state.mocker.list() {
        Ok(list) => Json(list).into_response(),
        Err(err) => map_error(&err, Some(correlation.into_string())).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/new",
    params(
        ("status" = u16, Query, description = "Response status code"),
        ("contentType" = String, Query, description = "Response content type"),
        ("charset" = String, Query, description = "Response charset")
    ),
    request_body(content = String, description = "Raw response body"),
    responses(
        (status = 200, body = NewMockOutput),
        (status = 409, description = "Unsupported status, content type or charset")
    )
)]
pub(crate) async fn new_mock(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Query(pairs): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Response {
    let params = group_params(pairs);
    match state.mocker.create(&params, body.to_vec()) {
        Ok(id) => Json(NewMockOutput { id }).into_response(),
        Err(err) => map_error(&err, Some(correlation.into_string())).into_response(),
    }
}

#[utoipa::path(
    method(get, post, put, patch, delete, head, options),
    path = "/v1/{id}",
    params(
        ("id" = String, Path, description = "Mock ID"),
        DelayQuery
    ),
    responses(
        (status = 200, description = "The stored response, with its own status"),
        (status = 400, description = "Malformed mock id"),
        (status = 404, description = "Unknown mock id")
    )
)]
pub(crate) async fn find_mock(
    State(state): State<AppState>,
    Extension(correlation): Extension<CorrelationId>,
    Path(id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let id = match MockId::new(id) {
        Ok(value) => value,
        Err(err) => {
            return map_error(&MockError::from(err), Some(correlation.into_string())).into_response();
        }
    };
    let record = match state.mocker.get(&id) {
        Ok(record) => record,
        Err(err) => return map_error(&err, Some(correlation.into_string())).into_response(),
    };
    render(
        &record,
        first_delay(&pairs),
        state.max_delay,
        &state.shutdown,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_repeated_params() {
        let params = group_params(vec![
            ("x-a".to_string(), "1".to_string()),
            ("status".to_string(), "200".to_string()),
            ("x-a".to_string(), "2".to_string()),
        ]);
        assert_eq!(params["x-a"], vec!["1".to_string(), "2".to_string()]);
        assert_eq!(params["status"], vec!["200".to_string()]);
    }

    #[test]
    fn first_delay_wins() {
        let pairs = vec![
            ("x-a".to_string(), "1".to_string()),
            ("delay".to_string(), "abc".to_string()),
            ("delay".to_string(), "10ms".to_string()),
        ];
        assert_eq!(first_delay(&pairs), Some("abc"));
        assert_eq!(first_delay(&pairs[..1]), None);
    }
}
