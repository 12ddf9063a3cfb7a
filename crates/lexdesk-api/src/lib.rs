//! # lexdesk-api
//!
//! HTTP API layer for LexDesk built on Axum.
//!
//! Provides the auth, license and admin endpoints, the bearer credential
//! middleware, extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::ApiError;
pub use state::AppState;
