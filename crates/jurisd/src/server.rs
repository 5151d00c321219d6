//! HTTP server for jurisd

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::JurisConfig;
use crate::lifecycle::LifecycleEngine;
use crate::routes;

/// Application state shared across handlers
pub struct AppState {
    pub engine: Arc<LifecycleEngine>,
    pub config: JurisConfig,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: Arc<LifecycleEngine>, config: JurisConfig) -> Self {
        Self {
            engine,
            config,
            start_time: Instant::now(),
        }
    }
}

/// Build the full application router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::case_routes())
        .merge(routes::advocate_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until the process is stopped
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr.clone();
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
