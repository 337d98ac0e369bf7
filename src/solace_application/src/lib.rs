pub mod services;
pub mod use_cases;

// Re-export commonly used types for convenience
pub use services::{
    backup_codes::{BackupCodes, BackupCodesError},
    otp_challenge::{OtpChallenge, OtpIssueError, OtpVerifyError},
    sessions::{SessionVerifier, VerifySessionError},
    token_lifecycle::{RedeemError, TokenLifecycle},
    trusted_devices::TrustedDeviceRegistry,
};

pub use use_cases::{
    change_password::{ChangePasswordError, ChangePasswordUseCase},
    delete_account::{DeleteAccountError, DeleteAccountUseCase},
    forgot_password::{ForgotPasswordError, ForgotPasswordUseCase},
    login::{DeviceMeta, LoginError, LoginOutcome, LoginUseCase},
    register::{RegisterError, RegisterUseCase},
    reset_password::{ResetPasswordError, ResetPasswordUseCase},
    two_factor::{TwoFactorError, TwoFactorUseCase},
    verify_backup_code::{VerifyBackupCodeError, VerifyBackupCodeUseCase},
    verify_email::{VerifyEmailError, VerifyEmailUseCase},
    verify_otp::{StepUpOutcome, VerifyOtpError, VerifyOtpUseCase},
};
