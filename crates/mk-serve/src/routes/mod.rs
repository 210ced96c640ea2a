pub mod error;
pub mod mocks;
pub mod reference;

use crate::middleware::correlation::correlation_middleware;
use crate::{AppState, openapi};
use axum::Router;
use axum::middleware;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(reference::router())
        .merge(mocks::router(state))
        .merge(openapi::router())
        .layer(middleware::from_fn(correlation_middleware))
        .layer(TraceLayer::new_for_http())
}
