//! HTTP server wiring for the detail proxy.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use cheongyak_core::{CheongyakConfig, CheongyakError, DetailLookupHandler};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::handlers::api_bunyanggwon_detail;

/// Shared state handed to every request.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Lookup handler shared across requests; holds no per-request state
    pub lookup: Arc<DetailLookupHandler>,
}

impl AppState {
    /// Wraps a lookup handler for use as router state.
    pub fn new(lookup: DetailLookupHandler) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }
}

/// Builds the API router.
///
/// Cross-origin requests are allowed since the mobile client calls the API
/// from a different origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/bunyanggwon/{id}", get(api_bunyanggwon_detail))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `listener` and serves the API until the process exits.
///
/// # Errors
///
/// - `CheongyakError::Io` - If accepting connections fails
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), CheongyakError> {
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// Runs the API server described by `config`.
///
/// # Errors
///
/// - `CheongyakError::Configuration` - If the bind address is invalid
/// - `CheongyakError::Provider` - If the upstream provider cannot be configured
/// - `CheongyakError::Io` - If the listener cannot be bound
pub async fn run_server(config: CheongyakConfig) -> Result<(), CheongyakError> {
    let addr: SocketAddr = config.server.socket_addr()?;
    let lookup = DetailLookupHandler::from_config(&config)?;

    let listener = TcpListener::bind(addr).await?;
    info!(
        "Cheongyak API server running on http://{} ({} mode)",
        listener.local_addr()?,
        config.runtime_mode
    );

    serve(listener, AppState::new(lookup)).await
}
