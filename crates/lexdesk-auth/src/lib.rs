//! # lexdesk-auth
//!
//! Session and license management for LexDesk.
//!
//! ## Modules
//!
//! - `jwt`: bearer credential signing and verification
//! - `password`: Argon2id password hashing
//! - `license`: per-tenant license counter and serialization locks
//! - `session`: session lifecycle manager and opaque session tokens
//! - `gateway`: login, logout, register and administrative operations
//! - `guard`: per-request bearer credential authentication

pub mod context;
pub mod gateway;
pub mod guard;
pub mod jwt;
pub mod license;
pub mod password;
pub mod session;

pub use context::{AuthContext, ClientInfo};
pub use gateway::AuthGateway;
pub use guard::RequestAuthenticator;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use license::{LicenseCounter, LicenseInfo, TenantLocks};
pub use password::PasswordHasher;
pub use session::{IssuedSession, SessionManager, SessionOwner, SweepReport};

#[cfg(test)]
pub(crate) mod testing;
