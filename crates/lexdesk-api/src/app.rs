//! Application builder: wires router, middleware and state into an Axum app.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tower_http::trace::TraceLayer;

use lexdesk_core::error::AppError;
use lexdesk_core::result::AppResult;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Binds `addr` and serves `app` until `shutdown` resolves.
pub async fn serve<F>(app: Router, addr: &str, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("LexDesk server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))
}
