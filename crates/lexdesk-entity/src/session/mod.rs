//! Session domain entities.

pub mod model;

pub use model::{ActiveSessionSummary, CreateSession, DeactivatedSession, Session};
