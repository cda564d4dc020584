//! HTTP query surface
//!
//! Three JSON endpoints under `/api`, plus an optional static directory for
//! everything else.

pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::services::LiveAggregator;
use crate::types::Result;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<LiveAggregator>,
    /// Default size of the global ranking
    pub top_n: usize,
}

pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api/regions", get(routes::regions))
        .route("/api/spot-deals", get(routes::spot_deals))
        .route("/api/best-global-deal", get(routes::best_global_deal))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C
pub async fn serve(state: AppState, addr: &str, static_dir: Option<&Path>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "server is running");

    axum::serve(listener, router(state, static_dir))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed
        std::future::pending::<()>().await;
    }
}
