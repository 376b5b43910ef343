mod error;
pub mod request;
pub mod routes;

use std::net::SocketAddr;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use common::{DisplaySettings, StrategyParams};

pub use error::ApiError;

/// Upper bound on request bodies; a few hundred thousand candles fit.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Shared application state injected into every route handler.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Indicator parameters for requests that omit some or all of them.
    pub defaults: StrategyParams,
    pub display: DisplaySettings,
}

/// Build the router with all routes and layers.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .merge(routes::chart_router())
        .merge(routes::health_router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// Bind and run the API server until ctrl-c.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Chart API listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for ctrl-c, running until killed");
            std::future::pending::<()>().await
        }
    }
}
