use crate::shutdown::Shutdown;
use mk_core::Mocker;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Evicts mocks beyond `limit` every `interval` until shutdown.
pub async fn run(mocker: Arc<dyn Mocker>, limit: i64, interval: Duration, shutdown: Shutdown) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = shutdown.wait() => break,
        }
        match mocker.clean(limit) {
            Ok(0) => debug!(limit, "nothing to clean"),
            Ok(removed) => info!(limit, removed, "cleaned old mocks"),
            Err(err) => warn!(limit, error = %err, "clean failed"),
        }
    }
    debug!("cleaner stopped");
}
