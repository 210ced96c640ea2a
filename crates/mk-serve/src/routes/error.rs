use axum::Json;
use axum::http::StatusCode;
use mk_core::error::MockError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub code: &'static str,
    pub message: String,
    pub correlation_id: Option<String>,
}

pub fn map_error(
    err: &MockError,
    correlation_id: Option<String>,
) -> (StatusCode, Json<ErrorEnvelope>) {
    let (status, code) = match err {
        MockError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        MockError::InvalidId { .. } => (StatusCode::BAD_REQUEST, "invalid_id"),
        MockError::Validation { .. }
        | MockError::List { .. }
        | MockError::Write { .. }
        | MockError::Delete { .. } => (StatusCode::CONFLICT, "conflict"),
        MockError::CorruptData { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_data"),
    };

    (
        status,
        Json(ErrorEnvelope {
            code,
            message: err.to_string(),
            correlation_id,
        }),
    )
}
