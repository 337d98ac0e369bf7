use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use solace_core::{BackupCode, BackupCodeStore, BackupCodeStoreError, UserId};

/// In-memory backup-code pool. Consumption mutates the pool under the
/// entry's shard lock, so a code can be spent by exactly one caller.
#[derive(Default, Clone)]
pub struct DashMapBackupCodeStore {
    pools: Arc<DashMap<UserId, Vec<BackupCode>>>,
}

impl DashMapBackupCodeStore {
    pub fn new() -> Self {
        Self {
            pools: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl BackupCodeStore for DashMapBackupCodeStore {
    async fn replace_pool(
        &self,
        user_id: UserId,
        codes: Vec<BackupCode>,
    ) -> Result<(), BackupCodeStoreError> {
        self.pools.insert(user_id, codes);
        Ok(())
    }

    async fn consume(
        &self,
        user_id: UserId,
        code: &BackupCode,
    ) -> Result<(), BackupCodeStoreError> {
        match self.pools.entry(user_id) {
            Entry::Occupied(mut entry) => {
                let pool = entry.get_mut();
                match pool.iter().position(|candidate| candidate == code) {
                    Some(index) => {
                        pool.swap_remove(index);
                        Ok(())
                    }
                    None => Err(BackupCodeStoreError::CodeNotFound),
                }
            }
            Entry::Vacant(_) => Err(BackupCodeStoreError::NoPool),
        }
    }

    async fn codes(&self, user_id: UserId) -> Result<Vec<BackupCode>, BackupCodeStoreError> {
        Ok(self
            .pools
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn clear(&self, user_id: UserId) -> Result<(), BackupCodeStoreError> {
        self.pools.remove(&user_id);
        Ok(())
    }
}
