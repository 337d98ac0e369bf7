use solace_core::{
    BackupCode, BackupCodeStore, BackupCodeStoreError, OtpChallengeStore, OtpStoreError, UserId,
    UserStore, UserStoreError,
};

use crate::services::backup_codes::BackupCodes;

#[derive(Debug, thiserror::Error)]
pub enum TwoFactorError {
    #[error("User not found")]
    UserNotFound,
    #[error("Two-factor authentication is not enabled")]
    NotEnabled,
    #[error("User store error: {0}")]
    UserStore(UserStoreError),
    #[error("Backup code store error: {0}")]
    BackupStore(#[from] BackupCodeStoreError),
    #[error("OTP store error: {0}")]
    OtpStore(#[from] OtpStoreError),
}

/// Two-factor administration: enabling creates the backup-code pool,
/// disabling tears down every piece of pending 2FA state.
pub struct TwoFactorUseCase<U, O, B>
where
    U: UserStore,
    O: OtpChallengeStore,
    B: BackupCodeStore,
{
    user_store: U,
    otp_store: O,
    backup: BackupCodes<B>,
}

impl<U, O, B> TwoFactorUseCase<U, O, B>
where
    U: UserStore,
    O: OtpChallengeStore,
    B: BackupCodeStore,
{
    pub fn new(user_store: U, otp_store: O, backup: BackupCodes<B>) -> Self {
        Self {
            user_store,
            otp_store,
            backup,
        }
    }

    /// Enables 2FA and returns the fresh backup codes. Re-enabling simply
    /// replaces the pool.
    #[tracing::instrument(name = "TwoFactorUseCase::enable", skip(self))]
    pub async fn enable(&self, user_id: UserId) -> Result<Vec<BackupCode>, TwoFactorError> {
        self.require_user(user_id).await?;
        self.user_store
            .set_two_factor_enabled(user_id, true)
            .await
            .map_err(TwoFactorError::UserStore)?;
        Ok(self.backup.regenerate(user_id).await?)
    }

    /// Disables 2FA: flag off, backup pool gone, pending challenge gone.
    #[tracing::instrument(name = "TwoFactorUseCase::disable", skip(self))]
    pub async fn disable(&self, user_id: UserId) -> Result<(), TwoFactorError> {
        self.require_user(user_id).await?;
        self.user_store
            .set_two_factor_enabled(user_id, false)
            .await
            .map_err(TwoFactorError::UserStore)?;
        self.backup.clear(user_id).await?;
        self.otp_store.remove(user_id).await?;
        Ok(())
    }

    /// New pool, all previous codes invalid at once.
    #[tracing::instrument(name = "TwoFactorUseCase::regenerate_backup_codes", skip(self))]
    pub async fn regenerate_backup_codes(
        &self,
        user_id: UserId,
    ) -> Result<Vec<BackupCode>, TwoFactorError> {
        self.require_two_factor(user_id).await?;
        Ok(self.backup.regenerate(user_id).await?)
    }

    pub async fn backup_codes(&self, user_id: UserId) -> Result<Vec<BackupCode>, TwoFactorError> {
        self.require_two_factor(user_id).await?;
        Ok(self.backup.codes(user_id).await?)
    }

    async fn require_user(&self, user_id: UserId) -> Result<(), TwoFactorError> {
        self.user_store
            .get_user_by_id(user_id)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                UserStoreError::UserNotFound => TwoFactorError::UserNotFound,
                other => TwoFactorError::UserStore(other),
            })
    }

    async fn require_two_factor(&self, user_id: UserId) -> Result<(), TwoFactorError> {
        let user = self
            .user_store
            .get_user_by_id(user_id)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound => TwoFactorError::UserNotFound,
                other => TwoFactorError::UserStore(other),
            })?;
        if !user.two_factor_enabled {
            return Err(TwoFactorError::NotEnabled);
        }
        Ok(())
    }
}
