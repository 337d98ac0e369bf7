use async_trait::async_trait;

use crate::domain::{
    backup_code::BackupCode,
    email::Email,
    otp_code::{OtpChallengeState, OtpCode},
    password::Password,
    session::Session,
    token::{OpaqueToken, SingleUseToken},
    trusted_device::{DeviceToken, TrustedDevice},
    user::{CredentialCheck, NewUser, User, UserId},
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("Unexpected user store error: {0}")]
    Unexpected(String),
}

/// Port for the user table. Implementations own password hashing so a
/// cleartext password never crosses back out of this boundary.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(&self, new_user: NewUser) -> Result<User, UserStoreError>;

    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError>;

    async fn get_user_by_id(&self, id: UserId) -> Result<User, UserStoreError>;

    /// Salted-hash comparison. Unknown user and wrong password are
    /// distinguishable here; callers collapse them before answering.
    async fn verify_credentials(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<CredentialCheck, UserStoreError>;

    async fn set_email_verified(&self, id: UserId) -> Result<(), UserStoreError>;

    async fn set_password(&self, id: UserId, new_password: Password) -> Result<(), UserStoreError>;

    async fn set_two_factor_enabled(&self, id: UserId, enabled: bool)
        -> Result<(), UserStoreError>;

    async fn delete_user(&self, id: UserId) -> Result<(), UserStoreError>;
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TokenStoreError {
    #[error("Unexpected token store error: {0}")]
    Unexpected(String),
}

/// Port for single-use tokens (verification, reset, temporary 2FA).
///
/// `take` is the load-bearing contract: lookup and invalidation must be one
/// indivisible operation, so two concurrent redemptions of the same token
/// can never both observe it.
#[async_trait]
pub trait SingleUseTokenStore: Send + Sync {
    /// Stores the token, replacing any live token with the same
    /// (subject, purpose) pair.
    async fn put(&self, token: SingleUseToken) -> Result<(), TokenStoreError>;

    /// Non-consuming read. Only the temporary-2FA flow uses this, because
    /// its token must survive wrong code attempts.
    async fn get(&self, token: &OpaqueToken) -> Result<Option<SingleUseToken>, TokenStoreError>;

    /// Atomic check-and-invalidate: removes and returns the record in one
    /// step, expired or not. Expiry is judged by the caller on the returned
    /// record.
    async fn take(&self, token: &OpaqueToken) -> Result<Option<SingleUseToken>, TokenStoreError>;

    async fn sweep_expired(&self) -> Result<usize, TokenStoreError>;
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OtpStoreError {
    #[error("No pending challenge for this user")]
    NoChallenge,
    #[error("Challenge has expired")]
    Expired,
    #[error("Code does not match")]
    CodeMismatch,
    #[error("Unexpected OTP store error: {0}")]
    Unexpected(String),
}

/// Port for pending one-time-code challenges, keyed by user.
#[async_trait]
pub trait OtpChallengeStore: Send + Sync {
    /// Last write wins: any previous challenge for the user is replaced and
    /// its code becomes invalid.
    async fn put(&self, challenge: OtpChallengeState) -> Result<(), OtpStoreError>;

    /// Atomic compare-and-remove. On a match the challenge is deleted in
    /// the same step, so concurrent submissions of one code cannot both
    /// succeed. On mismatch the challenge stays and its attempt counter is
    /// incremented.
    async fn consume(&self, user_id: UserId, code: &OtpCode) -> Result<(), OtpStoreError>;

    async fn remove(&self, user_id: UserId) -> Result<(), OtpStoreError>;

    async fn sweep_expired(&self) -> Result<usize, OtpStoreError>;
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BackupCodeStoreError {
    #[error("No backup codes for this user")]
    NoPool,
    #[error("Backup code not found")]
    CodeNotFound,
    #[error("Unexpected backup code store error: {0}")]
    Unexpected(String),
}

/// Port for the per-user backup code pool.
#[async_trait]
pub trait BackupCodeStore: Send + Sync {
    /// Swaps the entire pool in one write; there is no window where old and
    /// new codes are both valid.
    async fn replace_pool(
        &self,
        user_id: UserId,
        codes: Vec<BackupCode>,
    ) -> Result<(), BackupCodeStoreError>;

    /// Atomically removes exactly the matching code; the rest of the pool
    /// is untouched.
    async fn consume(&self, user_id: UserId, code: &BackupCode)
        -> Result<(), BackupCodeStoreError>;

    async fn codes(&self, user_id: UserId) -> Result<Vec<BackupCode>, BackupCodeStoreError>;

    async fn clear(&self, user_id: UserId) -> Result<(), BackupCodeStoreError>;
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DeviceStoreError {
    #[error("Unexpected trusted device store error: {0}")]
    Unexpected(String),
}

/// Port for trusted-device records, keyed by device token.
#[async_trait]
pub trait TrustedDeviceStore: Send + Sync {
    async fn insert(&self, device: TrustedDevice) -> Result<(), DeviceStoreError>;

    async fn get(&self, token: &DeviceToken) -> Result<Option<TrustedDevice>, DeviceStoreError>;

    /// Records a successful use of the device.
    async fn touch(&self, token: &DeviceToken) -> Result<(), DeviceStoreError>;

    /// Idempotent: removing an absent or foreign record is not an error,
    /// it just removes nothing.
    async fn remove(&self, user_id: UserId, token: &DeviceToken) -> Result<bool, DeviceStoreError>;

    async fn list(&self, user_id: UserId) -> Result<Vec<TrustedDevice>, DeviceStoreError>;

    async fn remove_all_for_user(&self, user_id: UserId) -> Result<usize, DeviceStoreError>;

    async fn sweep_expired(&self) -> Result<usize, DeviceStoreError>;
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionStoreError {
    #[error("Unexpected session store error: {0}")]
    Unexpected(String),
}

/// Port for active sessions, keyed by bearer token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError>;

    /// Pure read, no side effects; safe to call repeatedly and
    /// concurrently. Expired records are returned as-is and judged by the
    /// caller. Cleanup belongs to `sweep_expired` only.
    async fn get(&self, token: &OpaqueToken) -> Result<Option<Session>, SessionStoreError>;

    async fn remove(&self, token: &OpaqueToken) -> Result<bool, SessionStoreError>;

    async fn remove_all_for_user(&self, user_id: UserId) -> Result<usize, SessionStoreError>;

    async fn sweep_expired(&self) -> Result<usize, SessionStoreError>;
}
