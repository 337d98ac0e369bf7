use solace_core::{BackupCode, BackupCodeStore, BackupCodeStoreError, UserId};

const BACKUP_CODE_COUNT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum BackupCodesError {
    #[error("Invalid backup code")]
    InvalidBackupCode,
    #[error("Backup code store error: {0}")]
    Store(BackupCodeStoreError),
}

/// Backup-code pool component: ten pre-generated recovery codes per user,
/// each consumed exactly once, regenerated as a whole.
#[derive(Clone)]
pub struct BackupCodes<B>
where
    B: BackupCodeStore,
{
    store: B,
}

impl<B> BackupCodes<B>
where
    B: BackupCodeStore,
{
    pub fn new(store: B) -> Self {
        Self { store }
    }

    /// Replaces the whole pool in a single store write; the old codes are
    /// never valid alongside the new ones.
    #[tracing::instrument(name = "BackupCodes::regenerate", skip(self))]
    pub async fn regenerate(&self, user_id: UserId) -> Result<Vec<BackupCode>, BackupCodeStoreError> {
        let codes = BackupCode::generate_pool(BACKUP_CODE_COUNT);
        self.store.replace_pool(user_id, codes.clone()).await?;
        Ok(codes)
    }

    /// Consumes one code; the rest of the pool stays valid.
    #[tracing::instrument(name = "BackupCodes::consume", skip_all, fields(user_id = %user_id))]
    pub async fn consume(&self, user_id: UserId, code: &BackupCode) -> Result<(), BackupCodesError> {
        self.store.consume(user_id, code).await.map_err(|e| match e {
            BackupCodeStoreError::NoPool | BackupCodeStoreError::CodeNotFound => {
                BackupCodesError::InvalidBackupCode
            }
            other => BackupCodesError::Store(other),
        })
    }

    pub async fn codes(&self, user_id: UserId) -> Result<Vec<BackupCode>, BackupCodeStoreError> {
        self.store.codes(user_id).await
    }

    pub async fn clear(&self, user_id: UserId) -> Result<(), BackupCodeStoreError> {
        self.store.clear(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_adapters::persistence::DashMapBackupCodeStore;

    fn service() -> BackupCodes<DashMapBackupCodeStore> {
        BackupCodes::new(DashMapBackupCodeStore::new())
    }

    #[tokio::test]
    async fn codes_are_consumed_exactly_once_and_independently() {
        let backup = service();
        let user = UserId::new();
        let codes = backup.regenerate(user).await.unwrap();
        assert_eq!(codes.len(), BACKUP_CODE_COUNT);

        // Consuming one code does not affect the others.
        backup.consume(user, &codes[3]).await.unwrap();
        assert!(matches!(
            backup.consume(user, &codes[3]).await,
            Err(BackupCodesError::InvalidBackupCode)
        ));
        backup.consume(user, &codes[7]).await.unwrap();

        let remaining = backup.codes(user).await.unwrap();
        assert_eq!(remaining.len(), BACKUP_CODE_COUNT - 2);
    }

    #[tokio::test]
    async fn regenerate_invalidates_all_previous_codes() {
        let backup = service();
        let user = UserId::new();
        let old = backup.regenerate(user).await.unwrap();
        let new = backup.regenerate(user).await.unwrap();

        for code in &old {
            if !new.contains(code) {
                assert!(matches!(
                    backup.consume(user, code).await,
                    Err(BackupCodesError::InvalidBackupCode)
                ));
            }
        }
        assert!(backup.consume(user, &new[0]).await.is_ok());
    }

    #[tokio::test]
    async fn consume_without_pool_is_invalid() {
        let backup = service();
        let result = backup.consume(UserId::new(), &BackupCode::new()).await;
        assert!(matches!(result, Err(BackupCodesError::InvalidBackupCode)));
    }
}
