pub mod cleaner;
pub mod duration;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod shutdown;

use axum::Router;
use mk_core::Mocker;
use shutdown::Shutdown;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub mocker: Arc<dyn Mocker>,
    /// Ceiling applied to any delay a request asks for.
    pub max_delay: Duration,
    pub shutdown: Shutdown,
}

impl AppState {
    pub fn new(mocker: Arc<dyn Mocker>, max_delay: Duration, shutdown: Shutdown) -> Self {
        Self {
            mocker,
            max_delay,
            shutdown,
        }
    }
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, max_delay = ?state.max_delay, "mock server listening");
    let shutdown = state.shutdown.clone();
    axum::serve(listener, app(state))
        .with_graceful_shutdown(async move { shutdown.wait().await })
        .await
}
