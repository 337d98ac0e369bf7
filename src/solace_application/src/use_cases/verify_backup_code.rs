use solace_core::{
    BackupCode, BackupCodeStore, OpaqueToken, SessionStore, SessionStoreError,
    SingleUseTokenStore, TokenStoreError, TrustedDeviceStore, UserId, UserStore,
};

use crate::services::{
    backup_codes::{BackupCodes, BackupCodesError},
    sessions::SessionVerifier,
    token_lifecycle::TokenLifecycle,
    trusted_devices::TrustedDeviceRegistry,
};
use crate::use_cases::login::DeviceMeta;
use crate::use_cases::verify_otp::{check_temp_token, finish_step_up, StepUpOutcome, VerifyOtpError};

#[derive(Debug, thiserror::Error)]
pub enum VerifyBackupCodeError {
    #[error("Invalid or expired login attempt")]
    InvalidTempToken,
    #[error("Invalid backup code")]
    InvalidBackupCode,
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),
    #[error("Backup code store error: {0}")]
    BackupStore(solace_core::BackupCodeStoreError),
}

/// OTP_OR_BACKUP_PENDING → AUTHENTICATED via a backup code instead of the
/// dispatched one-time code. The consumed code disappears from the pool;
/// every other code stays valid.
pub struct VerifyBackupCodeUseCase<U, T, B, D, S>
where
    U: UserStore,
    T: SingleUseTokenStore,
    B: BackupCodeStore,
    D: TrustedDeviceStore,
    S: SessionStore,
{
    tokens: TokenLifecycle<T>,
    backup: BackupCodes<B>,
    devices: TrustedDeviceRegistry<D>,
    sessions: SessionVerifier<S, U>,
}

impl<U, T, B, D, S> VerifyBackupCodeUseCase<U, T, B, D, S>
where
    U: UserStore,
    T: SingleUseTokenStore,
    B: BackupCodeStore,
    D: TrustedDeviceStore,
    S: SessionStore,
{
    pub fn new(
        tokens: TokenLifecycle<T>,
        backup: BackupCodes<B>,
        devices: TrustedDeviceRegistry<D>,
        sessions: SessionVerifier<S, U>,
    ) -> Self {
        Self {
            tokens,
            backup,
            devices,
            sessions,
        }
    }

    #[tracing::instrument(name = "VerifyBackupCodeUseCase::execute", skip_all, fields(user_id = %user_id))]
    pub async fn execute(
        &self,
        user_id: UserId,
        code: BackupCode,
        temp_token: OpaqueToken,
        trust_device: Option<DeviceMeta>,
    ) -> Result<StepUpOutcome, VerifyBackupCodeError> {
        check_temp_token(&self.tokens, user_id, &temp_token)
            .await
            .map_err(map_step_up_error)?;

        self.backup
            .consume(user_id, &code)
            .await
            .map_err(|e| match e {
                BackupCodesError::InvalidBackupCode => VerifyBackupCodeError::InvalidBackupCode,
                BackupCodesError::Store(inner) => VerifyBackupCodeError::BackupStore(inner),
            })?;

        finish_step_up(
            &self.tokens,
            &self.devices,
            &self.sessions,
            user_id,
            temp_token,
            trust_device,
        )
        .await
        .map_err(map_step_up_error)
    }
}

fn map_step_up_error(e: VerifyOtpError) -> VerifyBackupCodeError {
    match e {
        VerifyOtpError::InvalidTempToken => VerifyBackupCodeError::InvalidTempToken,
        VerifyOtpError::TokenStore(inner) => VerifyBackupCodeError::TokenStore(inner),
        VerifyOtpError::SessionStore(inner) => VerifyBackupCodeError::SessionStore(inner),
        // The OTP-specific variants cannot come out of the shared helpers.
        VerifyOtpError::InvalidOtp | VerifyOtpError::OtpExpired => {
            VerifyBackupCodeError::InvalidTempToken
        }
        VerifyOtpError::OtpStore(inner) => {
            VerifyBackupCodeError::TokenStore(TokenStoreError::Unexpected(inner.to_string()))
        }
    }
}
