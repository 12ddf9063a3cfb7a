//! # lexdesk-database
//!
//! Persistence for the session and license core: repository traits, their
//! PostgreSQL implementations, connection pool management, embedded
//! migrations, and a mutex-guarded in-memory store for single-node
//! development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::{SessionRepository, TenantRepository, UserRepository};
