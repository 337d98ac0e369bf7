pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    backup_code::{BackupCode, BackupCodeError},
    email::{Email, EmailError},
    otp_code::{OtpChallengeState, OtpCode, OtpCodeError},
    password::{Password, PasswordError},
    role::{Role, RoleError},
    session::{Session, SessionIdentity},
    token::{OpaqueToken, SingleUseToken, TokenPurpose, TokenSubject},
    trusted_device::{DeviceToken, TrustedDevice},
    user::{CredentialCheck, NewUser, User, UserId},
};

pub use ports::{
    repositories::{
        BackupCodeStore, BackupCodeStoreError, DeviceStoreError, OtpChallengeStore, OtpStoreError,
        SessionStore, SessionStoreError, SingleUseTokenStore, TokenStoreError, TrustedDeviceStore,
        UserStore, UserStoreError,
    },
    services::MailClient,
};
