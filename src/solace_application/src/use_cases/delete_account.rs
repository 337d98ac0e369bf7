use solace_core::{
    BackupCodeStore, BackupCodeStoreError, DeviceStoreError, OtpChallengeStore, OtpStoreError,
    SessionStore, SessionStoreError, TrustedDeviceStore, UserId, UserStore, UserStoreError,
};

use crate::services::{
    backup_codes::BackupCodes, sessions::SessionVerifier, trusted_devices::TrustedDeviceRegistry,
};

#[derive(Debug, thiserror::Error)]
pub enum DeleteAccountError {
    #[error("User not found")]
    UserNotFound,
    #[error("User store error: {0}")]
    UserStore(UserStoreError),
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),
    #[error("Trusted device store error: {0}")]
    DeviceStore(#[from] DeviceStoreError),
    #[error("OTP store error: {0}")]
    OtpStore(#[from] OtpStoreError),
    #[error("Backup code store error: {0}")]
    BackupStore(#[from] BackupCodeStoreError),
}

/// Account deletion: the user row and every piece of dependent auth state
/// (sessions, trusted devices, pending challenge, backup codes).
pub struct DeleteAccountUseCase<U, S, D, O, B>
where
    U: UserStore,
    S: SessionStore,
    D: TrustedDeviceStore,
    O: OtpChallengeStore,
    B: BackupCodeStore,
{
    user_store: U,
    sessions: SessionVerifier<S, U>,
    devices: TrustedDeviceRegistry<D>,
    otp_store: O,
    backup: BackupCodes<B>,
}

impl<U, S, D, O, B> DeleteAccountUseCase<U, S, D, O, B>
where
    U: UserStore,
    S: SessionStore,
    D: TrustedDeviceStore,
    O: OtpChallengeStore,
    B: BackupCodeStore,
{
    pub fn new(
        user_store: U,
        sessions: SessionVerifier<S, U>,
        devices: TrustedDeviceRegistry<D>,
        otp_store: O,
        backup: BackupCodes<B>,
    ) -> Self {
        Self {
            user_store,
            sessions,
            devices,
            otp_store,
            backup,
        }
    }

    #[tracing::instrument(name = "DeleteAccountUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: UserId) -> Result<(), DeleteAccountError> {
        self.user_store
            .delete_user(user_id)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound => DeleteAccountError::UserNotFound,
                other => DeleteAccountError::UserStore(other),
            })?;

        self.sessions.revoke_all_for_user(user_id).await?;
        self.devices.remove_all_for_user(user_id).await?;
        self.otp_store.remove(user_id).await?;
        self.backup.clear(user_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use solace_adapters::persistence::{
        DashMapBackupCodeStore, DashMapOtpStore, DashMapSessionStore,
        DashMapTrustedDeviceStore, HashMapUserStore,
    };
    use solace_core::{Email, NewUser, Password};

    #[tokio::test]
    async fn deletion_removes_the_user_and_all_auth_state() {
        let users = HashMapUserStore::new();
        let sessions = SessionVerifier::new(
            DashMapSessionStore::new(),
            users.clone(),
            Duration::hours(1),
        );
        let devices =
            TrustedDeviceRegistry::new(DashMapTrustedDeviceStore::new(), Duration::days(30));
        let backup = BackupCodes::new(DashMapBackupCodeStore::new());
        let delete = DeleteAccountUseCase::new(
            users.clone(),
            sessions.clone(),
            devices.clone(),
            DashMapOtpStore::new(),
            backup.clone(),
        );

        let user = users
            .add_user(NewUser::new(
                Email::try_from("leaving@example.com".to_string()).unwrap(),
                Password::try_from("correct horse".to_string()).unwrap(),
            ))
            .await
            .unwrap();
        let session_token = sessions.issue(user.id).await.unwrap();
        let device_token = devices
            .trust_device(user.id, "laptop".into(), None, None)
            .await
            .unwrap()
            .token;
        backup.regenerate(user.id).await.unwrap();

        delete.execute(user.id).await.unwrap();

        assert!(users.get_user_by_id(user.id).await.is_err());
        assert!(sessions.verify(&session_token).await.is_err());
        assert!(!devices.is_trusted(user.id, &device_token).await.unwrap());
        assert!(backup.codes(user.id).await.unwrap().is_empty());

        // Deleting again reports the missing user.
        assert!(matches!(
            delete.execute(user.id).await,
            Err(DeleteAccountError::UserNotFound)
        ));
    }
}
