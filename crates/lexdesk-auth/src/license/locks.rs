//! Per-tenant serialization points.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;
use uuid::Uuid;

/// One async mutex per tenant.
///
/// Session creation and every deactivation path hold the tenant's lock
/// across their check-and-write sequence, so two concurrent logins can never
/// both observe the same free license.
#[derive(Debug, Clone, Default)]
pub struct TenantLocks {
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl TenantLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and returns the tenant's lock guard.
    pub async fn acquire(&self, tenant_id: Uuid) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard lock is released before awaiting.
        let lock = self
            .locks
            .entry(tenant_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        trace!(tenant_id = %tenant_id, "Acquiring tenant lock");
        lock.lock_owned().await
    }

    /// Number of tenants that have ever been locked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no tenant has been locked yet.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_same_tenant_serializes() {
        let locks = TenantLocks::new();
        let tenant = Uuid::new_v4();

        let guard = locks.acquire(tenant).await;
        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire(tenant).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_tenants_do_not_block() {
        let locks = TenantLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        let _b = locks.acquire(Uuid::new_v4()).await;
        assert_eq!(locks.len(), 2);
    }
}
