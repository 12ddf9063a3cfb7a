//! HTTP-level integration tests against the in-memory store.

mod admin_test;
mod auth_test;
mod helpers;
mod license_test;
