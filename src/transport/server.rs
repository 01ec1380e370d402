use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::broker::Broker;
use crate::transport::http::{AppState, router};
use crate::utils::error::Result;

/// Bind `addr` and serve the HTTP API until `shutdown` resolves.
pub async fn start_http_server<F>(addr: &str, broker: Arc<Broker>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on http://{}", listener.local_addr()?);

    serve(listener, AppState::new(broker), shutdown).await
}

/// Serve the HTTP API on an already bound listener.
///
/// When `shutdown` resolves, open subscription streams are closed first so the
/// graceful shutdown does not wait on them forever.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state.clone());

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Shutdown signal received, closing subscriber streams");
            state.close_streams();
        })
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
