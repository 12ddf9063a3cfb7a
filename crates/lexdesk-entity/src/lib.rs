//! # lexdesk-entity
//!
//! Domain entity models for LexDesk. Every struct in this crate represents a
//! database table row or a value object derived from one. Row types derive
//! `sqlx::FromRow`.

pub mod session;
pub mod tenant;
pub mod user;
