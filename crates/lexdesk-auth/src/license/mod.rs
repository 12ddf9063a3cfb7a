//! Per-tenant license accounting.

pub mod counter;
pub mod locks;

pub use counter::{LicenseCounter, LicenseInfo};
pub use locks::TenantLocks;
