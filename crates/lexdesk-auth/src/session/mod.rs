//! Session lifecycle: creation, validation, deactivation and expiry sweep.

pub mod manager;
pub mod token;

pub use manager::{IssuedSession, SessionManager, SessionOwner, SweepReport};
pub use token::generate_session_token;
