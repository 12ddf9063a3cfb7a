//! Route definitions for the LexDesk HTTP API.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with public and authenticated routes.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(session_routes())
        .merge(license_routes())
        .merge(admin_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public_routes())
        .merge(protected)
        .with_state(state)
}

/// Health, login and register: no credential required
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/register", post(handlers::auth::register))
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
}

fn license_routes() -> Router<AppState> {
    Router::new()
        .route("/api/license", get(handlers::license::get_license))
        .route(
            "/api/admin/license/limit",
            put(handlers::license::set_license_limit),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/users/{id}/force-logout",
            post(handlers::admin::force_logout),
        )
        .route(
            "/api/admin/users/{id}/deactivate",
            post(handlers::admin::deactivate_user),
        )
}
