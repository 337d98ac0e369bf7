use secrecy::Secret;

use solace_adapters::config::EngineSettings;
use solace_application::{
    BackupCodes, ChangePasswordError, ChangePasswordUseCase, DeleteAccountError,
    DeleteAccountUseCase, DeviceMeta, ForgotPasswordUseCase, LoginError, LoginOutcome,
    LoginUseCase, OtpChallenge, RegisterError, RegisterUseCase, ResetPasswordError,
    ResetPasswordUseCase, SessionVerifier, TokenLifecycle, TrustedDeviceRegistry, TwoFactorError,
    TwoFactorUseCase, VerifyBackupCodeError, VerifyBackupCodeUseCase, VerifyEmailError,
    VerifyEmailUseCase, VerifyOtpError, VerifyOtpUseCase, VerifySessionError,
};
use solace_core::{
    BackupCode, BackupCodeStore, DeviceToken, Email, MailClient, OpaqueToken, OtpChallengeStore,
    OtpCode, Password, SessionIdentity, SessionStore, SingleUseTokenStore, TokenPurpose,
    TokenSubject, TrustedDeviceStore, UserId, UserStore, UserStoreError,
};

use crate::outcomes::{
    BackupCodesOutcome, DeviceInfo, LoginResult, SimpleOutcome, StepUpResult, SweepReport,
    TrustDeviceOutcome, TrustedDevicesOutcome, VerifySessionOutcome,
};

/// Gateway handshake failure: the connection must be rejected before any
/// event channel is established.
#[derive(Debug, thiserror::Error)]
pub enum HandshakeError {
    #[error("Authentication token required")]
    MissingToken,
    #[error("Invalid authentication token")]
    Rejected,
}

/// The authentication and session-trust engine.
///
/// Every store and the mail collaborator are explicit constructor
/// dependencies; nothing reaches for process-wide state. The same instance
/// serves the request/response API (per-request `verify_session`) and the
/// real-time gateway (`authorize_connection` at handshake).
pub struct AuthEngine<U, T, O, B, D, S, M>
where
    U: UserStore + Clone + 'static,
    T: SingleUseTokenStore + Clone + 'static,
    O: OtpChallengeStore + Clone + 'static,
    B: BackupCodeStore + Clone + 'static,
    D: TrustedDeviceStore + Clone + 'static,
    S: SessionStore + Clone + 'static,
    M: MailClient + Clone + 'static,
{
    user_store: U,
    otp_store: O,
    mail_client: M,
    tokens: TokenLifecycle<T>,
    otp: OtpChallenge<O, M>,
    backup: BackupCodes<B>,
    devices: TrustedDeviceRegistry<D>,
    sessions: SessionVerifier<S, U>,
    settings: EngineSettings,
}

impl<U, T, O, B, D, S, M> AuthEngine<U, T, O, B, D, S, M>
where
    U: UserStore + Clone + 'static,
    T: SingleUseTokenStore + Clone + 'static,
    O: OtpChallengeStore + Clone + 'static,
    B: BackupCodeStore + Clone + 'static,
    D: TrustedDeviceStore + Clone + 'static,
    S: SessionStore + Clone + 'static,
    M: MailClient + Clone + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_store: U,
        token_store: T,
        otp_store: O,
        backup_code_store: B,
        device_store: D,
        session_store: S,
        mail_client: M,
        settings: EngineSettings,
    ) -> Self {
        let tokens = TokenLifecycle::new(token_store);
        let otp = OtpChallenge::new(otp_store.clone(), mail_client.clone(), settings.otp_ttl());
        let backup = BackupCodes::new(backup_code_store);
        let devices = TrustedDeviceRegistry::new(device_store, settings.trusted_device_ttl());
        let sessions =
            SessionVerifier::new(session_store, user_store.clone(), settings.session_ttl());

        Self {
            user_store,
            otp_store,
            mail_client,
            tokens,
            otp,
            backup,
            devices,
            sessions,
            settings,
        }
    }

    // ------------------------------------------------------------------
    // Registration and email verification
    // ------------------------------------------------------------------

    #[tracing::instrument(name = "AuthEngine::register", skip_all)]
    pub async fn register(&self, email: &str, password: &str) -> SimpleOutcome {
        let Ok(email) = Email::try_from(Secret::from(email.to_string())) else {
            return SimpleOutcome::failure("Invalid email address");
        };
        let password = match Password::try_from(Secret::from(password.to_string())) {
            Ok(password) => password,
            Err(e) => return SimpleOutcome::failure(e.to_string()),
        };

        let use_case = RegisterUseCase::new(
            self.user_store.clone(),
            self.tokens.clone(),
            self.mail_client.clone(),
            self.settings.verification_token_ttl(),
        );

        match use_case.execute(email, password).await {
            Ok(_) => SimpleOutcome::ok(
                "User registered successfully. Please check your email to verify your account.",
            ),
            Err(RegisterError::UserAlreadyExists) => {
                SimpleOutcome::failure("User with this email already exists")
            }
            Err(e) => {
                tracing::error!(error = %e, "registration failed");
                SimpleOutcome::failure("Failed to register user")
            }
        }
    }

    #[tracing::instrument(name = "AuthEngine::resend_verification_email", skip_all)]
    pub async fn resend_verification_email(&self, email: &str) -> SimpleOutcome {
        let Ok(email) = Email::try_from(Secret::from(email.to_string())) else {
            return SimpleOutcome::failure("User not found");
        };

        let user = match self.user_store.get_user(&email).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => return SimpleOutcome::failure("User not found"),
            Err(e) => {
                tracing::error!(error = %e, "resend verification lookup failed");
                return SimpleOutcome::failure("Failed to resend verification email");
            }
        };

        let token = match self
            .tokens
            .issue(
                TokenSubject::User(user.id),
                TokenPurpose::EmailVerification,
                self.settings.verification_token_ttl(),
            )
            .await
        {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "verification token issuance failed");
                return SimpleOutcome::failure("Failed to resend verification email");
            }
        };

        if let Err(e) = self
            .mail_client
            .send_email(&email, "Verify your email address", token.as_str())
            .await
        {
            tracing::warn!(error = %e, "failed to dispatch verification email");
        }
        SimpleOutcome::ok("Verification email sent successfully")
    }

    #[tracing::instrument(name = "AuthEngine::verify_email_token", skip_all)]
    pub async fn verify_email_token(&self, token: &str) -> SimpleOutcome {
        let use_case = VerifyEmailUseCase::new(self.user_store.clone(), self.tokens.clone());

        match use_case
            .execute(&OpaqueToken::from(token.to_string()))
            .await
        {
            Ok(()) => SimpleOutcome::ok("Email verified successfully"),
            Err(VerifyEmailError::InvalidToken) => {
                SimpleOutcome::failure("Invalid verification token")
            }
            Err(VerifyEmailError::TokenExpired) => {
                SimpleOutcome::failure("Verification token has expired")
            }
            Err(e) => {
                tracing::error!(error = %e, "email verification failed");
                SimpleOutcome::failure("Failed to verify email")
            }
        }
    }

    // ------------------------------------------------------------------
    // Login and step-up
    // ------------------------------------------------------------------

    #[tracing::instrument(name = "AuthEngine::login", skip_all)]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        device_token: Option<&str>,
    ) -> LoginResult {
        // Malformed input is indistinguishable from bad credentials.
        let Ok(email) = Email::try_from(Secret::from(email.to_string())) else {
            return LoginResult::failure("Invalid email or password");
        };
        let Ok(password) = Password::try_from(Secret::from(password.to_string())) else {
            return LoginResult::failure("Invalid email or password");
        };
        let device_token = device_token.map(|token| DeviceToken::from(token.to_string()));

        let use_case = LoginUseCase::new(
            self.user_store.clone(),
            self.tokens.clone(),
            self.otp.clone(),
            self.devices.clone(),
            self.sessions.clone(),
            self.mail_client.clone(),
            self.settings.verification_token_ttl(),
            self.settings.temp_token_ttl(),
        );

        match use_case.execute(email, password, device_token).await {
            Ok(LoginOutcome::Authenticated {
                user_id,
                session_token,
            }) => LoginResult {
                success: true,
                requires_two_factor: false,
                temp_token: None,
                session_token: Some(session_token.as_str().to_string()),
                user_id: Some(user_id),
                message: "Login successful".to_string(),
            },
            Ok(LoginOutcome::TwoFactorRequired {
                user_id,
                temp_token,
            }) => LoginResult {
                success: true,
                requires_two_factor: true,
                temp_token: Some(temp_token.as_str().to_string()),
                session_token: None,
                user_id: Some(user_id),
                message: "Login requires 2FA verification".to_string(),
            },
            Err(LoginError::InvalidCredentials) => {
                LoginResult::failure("Invalid email or password")
            }
            Err(LoginError::EmailNotVerified) => {
                LoginResult::failure("Please verify your email before logging in")
            }
            Err(e) => {
                tracing::error!(error = %e, "login failed");
                LoginResult::failure("Failed to login")
            }
        }
    }

    #[tracing::instrument(name = "AuthEngine::verify_otp", skip_all, fields(user_id = %user_id))]
    pub async fn verify_otp(
        &self,
        user_id: UserId,
        code: &str,
        temp_token: &str,
        trust_device: Option<DeviceMeta>,
    ) -> StepUpResult {
        let Ok(code) = OtpCode::parse(code) else {
            return StepUpResult::failure("Invalid OTP code");
        };

        let use_case = VerifyOtpUseCase::new(
            self.tokens.clone(),
            self.otp.clone(),
            self.devices.clone(),
            self.sessions.clone(),
        );

        match use_case
            .execute(
                user_id,
                code,
                OpaqueToken::from(temp_token.to_string()),
                trust_device,
            )
            .await
        {
            Ok(outcome) => StepUpResult {
                success: true,
                session_token: Some(outcome.session_token.as_str().to_string()),
                device_token: outcome
                    .device_token
                    .map(|token| token.as_str().to_string()),
                message: "OTP verified successfully".to_string(),
            },
            Err(VerifyOtpError::InvalidTempToken) => {
                StepUpResult::failure("Invalid or expired session")
            }
            Err(VerifyOtpError::InvalidOtp) => StepUpResult::failure("Invalid OTP code"),
            Err(VerifyOtpError::OtpExpired) => StepUpResult::failure("OTP code has expired"),
            Err(e) => {
                tracing::error!(error = %e, "OTP verification failed");
                StepUpResult::failure("Failed to verify OTP")
            }
        }
    }

    #[tracing::instrument(name = "AuthEngine::verify_backup_code", skip_all, fields(user_id = %user_id))]
    pub async fn verify_backup_code(
        &self,
        user_id: UserId,
        code: &str,
        temp_token: &str,
        trust_device: Option<DeviceMeta>,
    ) -> StepUpResult {
        let Ok(code) = BackupCode::parse(code) else {
            return StepUpResult::failure("Invalid backup code");
        };

        let use_case = VerifyBackupCodeUseCase::new(
            self.tokens.clone(),
            self.backup.clone(),
            self.devices.clone(),
            self.sessions.clone(),
        );

        match use_case
            .execute(
                user_id,
                code,
                OpaqueToken::from(temp_token.to_string()),
                trust_device,
            )
            .await
        {
            Ok(outcome) => StepUpResult {
                success: true,
                session_token: Some(outcome.session_token.as_str().to_string()),
                device_token: outcome
                    .device_token
                    .map(|token| token.as_str().to_string()),
                message: "Backup code verified successfully".to_string(),
            },
            Err(VerifyBackupCodeError::InvalidTempToken) => {
                StepUpResult::failure("Invalid or expired session")
            }
            Err(VerifyBackupCodeError::InvalidBackupCode) => {
                StepUpResult::failure("Invalid backup code")
            }
            Err(e) => {
                tracing::error!(error = %e, "backup code verification failed");
                StepUpResult::failure("Failed to verify backup code")
            }
        }
    }

    // ------------------------------------------------------------------
    // Password flows
    // ------------------------------------------------------------------

    #[tracing::instrument(name = "AuthEngine::forgot_password", skip_all)]
    pub async fn forgot_password(&self, email: &str) -> SimpleOutcome {
        const RESET_MESSAGE: &str =
            "If an account with that email exists, we've sent a password reset link";

        // A malformed address cannot belong to an account; answer exactly
        // like an unknown one.
        let Ok(email) = Email::try_from(Secret::from(email.to_string())) else {
            return SimpleOutcome::ok(RESET_MESSAGE);
        };

        let use_case = ForgotPasswordUseCase::new(
            self.user_store.clone(),
            self.tokens.clone(),
            self.mail_client.clone(),
            self.settings.reset_token_ttl(),
        );

        match use_case.execute(email).await {
            Ok(()) => SimpleOutcome::ok(RESET_MESSAGE),
            Err(e) => {
                tracing::error!(error = %e, "forgot password failed");
                SimpleOutcome::failure("Failed to process forgot password request")
            }
        }
    }

    #[tracing::instrument(name = "AuthEngine::reset_password", skip_all)]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> SimpleOutcome {
        let new_password = match Password::try_from(Secret::from(new_password.to_string())) {
            Ok(password) => password,
            Err(e) => return SimpleOutcome::failure(e.to_string()),
        };

        let use_case = ResetPasswordUseCase::new(self.user_store.clone(), self.tokens.clone());

        match use_case
            .execute(&OpaqueToken::from(token.to_string()), new_password)
            .await
        {
            Ok(()) => SimpleOutcome::ok("Password reset successful"),
            Err(ResetPasswordError::InvalidToken) => {
                SimpleOutcome::failure("Invalid or already used reset token")
            }
            Err(ResetPasswordError::TokenExpired) => {
                SimpleOutcome::failure("Reset token has expired")
            }
            Err(e) => {
                tracing::error!(error = %e, "password reset failed");
                SimpleOutcome::failure("Failed to reset password")
            }
        }
    }

    #[tracing::instrument(name = "AuthEngine::change_password", skip_all, fields(user_id = %user_id))]
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> SimpleOutcome {
        let Ok(current_password) = Password::try_from(Secret::from(current_password.to_string()))
        else {
            return SimpleOutcome::failure("Current password is incorrect");
        };
        let new_password = match Password::try_from(Secret::from(new_password.to_string())) {
            Ok(password) => password,
            Err(e) => return SimpleOutcome::failure(e.to_string()),
        };

        let use_case = ChangePasswordUseCase::new(self.user_store.clone(), self.sessions.clone());

        match use_case
            .execute(user_id, current_password, new_password)
            .await
        {
            Ok(()) => SimpleOutcome::ok(
                "Password changed successfully. Please log in again with your new password.",
            ),
            Err(ChangePasswordError::IncorrectPassword) => {
                SimpleOutcome::failure("Current password is incorrect")
            }
            Err(ChangePasswordError::UserNotFound) => SimpleOutcome::failure("User not found"),
            Err(e) => {
                tracing::error!(error = %e, "password change failed");
                SimpleOutcome::failure("Failed to change password")
            }
        }
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    #[tracing::instrument(name = "AuthEngine::logout", skip_all)]
    pub async fn logout(&self, token: &str) -> SimpleOutcome {
        match self
            .sessions
            .revoke(&OpaqueToken::from(token.to_string()))
            .await
        {
            Ok(true) => SimpleOutcome::ok("Logout successful"),
            Ok(false) => SimpleOutcome::failure("Session not found"),
            Err(e) => {
                tracing::error!(error = %e, "logout failed");
                SimpleOutcome::failure("Failed to logout")
            }
        }
    }

    /// Per-request verification for the API layer. Read-only.
    #[tracing::instrument(name = "AuthEngine::verify_session", skip_all)]
    pub async fn verify_session(&self, token: &str) -> VerifySessionOutcome {
        match self
            .sessions
            .verify(&OpaqueToken::from(token.to_string()))
            .await
        {
            Ok(identity) => VerifySessionOutcome {
                valid: true,
                user: Some(identity.into()),
            },
            Err(VerifySessionError::Invalid) => VerifySessionOutcome::invalid(),
            Err(e) => {
                // Fail closed: a broken store denies, it never grants.
                tracing::error!(error = %e, "session verification failed");
                VerifySessionOutcome::invalid()
            }
        }
    }

    /// Handshake guard for the real-time gateway: exactly one verification
    /// per connection attempt, and the identity is fixed for the
    /// connection's lifetime afterwards.
    #[tracing::instrument(name = "AuthEngine::authorize_connection", skip_all)]
    pub async fn authorize_connection(
        &self,
        token: Option<&str>,
    ) -> Result<SessionIdentity, HandshakeError> {
        let token = token.filter(|t| !t.is_empty()).ok_or(HandshakeError::MissingToken)?;

        match self
            .sessions
            .verify(&OpaqueToken::from(token.to_string()))
            .await
        {
            Ok(identity) => Ok(identity),
            Err(VerifySessionError::Invalid) => Err(HandshakeError::Rejected),
            Err(e) => {
                tracing::error!(error = %e, "gateway handshake verification failed");
                Err(HandshakeError::Rejected)
            }
        }
    }

    // ------------------------------------------------------------------
    // Trusted devices
    // ------------------------------------------------------------------

    /// Only reachable with an authenticated user id: either from the
    /// post-2FA step-up paths or from an API caller that already passed
    /// `verify_session`.
    #[tracing::instrument(name = "AuthEngine::trust_device", skip_all, fields(user_id = %user_id))]
    pub async fn trust_device(
        &self,
        user_id: UserId,
        device_name: &str,
        device_type: Option<&str>,
        ip_address: Option<&str>,
    ) -> TrustDeviceOutcome {
        match self
            .devices
            .trust_device(
                user_id,
                device_name.to_string(),
                device_type.map(str::to_string),
                ip_address.map(str::to_string),
            )
            .await
        {
            Ok(device) => TrustDeviceOutcome {
                success: true,
                device_token: Some(device.token.as_str().to_string()),
                expires_at: Some(device.expires_at),
                message: "Device trusted successfully".to_string(),
            },
            Err(e) => {
                tracing::error!(error = %e, "trust device failed");
                TrustDeviceOutcome {
                    success: false,
                    device_token: None,
                    expires_at: None,
                    message: "Failed to trust device".to_string(),
                }
            }
        }
    }

    #[tracing::instrument(name = "AuthEngine::remove_trusted_device", skip_all, fields(user_id = %user_id))]
    pub async fn remove_trusted_device(
        &self,
        user_id: UserId,
        device_token: &str,
    ) -> SimpleOutcome {
        match self
            .devices
            .remove(user_id, &DeviceToken::from(device_token.to_string()))
            .await
        {
            Ok(true) => SimpleOutcome::ok("Device removed successfully"),
            Ok(false) => SimpleOutcome::failure("Device not found or does not belong to user"),
            Err(e) => {
                tracing::error!(error = %e, "remove trusted device failed");
                SimpleOutcome::failure("Failed to remove trusted device")
            }
        }
    }

    #[tracing::instrument(name = "AuthEngine::trusted_devices", skip_all, fields(user_id = %user_id))]
    pub async fn trusted_devices(&self, user_id: UserId) -> TrustedDevicesOutcome {
        match self.devices.list(user_id).await {
            Ok(devices) => TrustedDevicesOutcome {
                success: true,
                devices: devices
                    .into_iter()
                    .map(|device| DeviceInfo {
                        device_token: device.token.as_str().to_string(),
                        name: device.name,
                        device_type: device.device_type,
                        ip_address: device.ip_address,
                        expires_at: device.expires_at,
                        last_used: device.last_used,
                    })
                    .collect(),
                message: "Trusted devices retrieved successfully".to_string(),
            },
            Err(e) => {
                tracing::error!(error = %e, "trusted device listing failed");
                TrustedDevicesOutcome {
                    success: false,
                    devices: Vec::new(),
                    message: "Failed to get trusted devices".to_string(),
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Two-factor administration
    // ------------------------------------------------------------------

    #[tracing::instrument(name = "AuthEngine::enable_two_factor", skip_all, fields(user_id = %user_id))]
    pub async fn enable_two_factor(&self, user_id: UserId) -> BackupCodesOutcome {
        match self.two_factor().enable(user_id).await {
            Ok(codes) => BackupCodesOutcome {
                success: true,
                backup_codes: codes.iter().map(|code| code.as_str().to_string()).collect(),
                message: "Two-factor authentication enabled successfully".to_string(),
            },
            Err(TwoFactorError::UserNotFound) => BackupCodesOutcome::failure("User not found"),
            Err(e) => {
                tracing::error!(error = %e, "enabling two-factor failed");
                BackupCodesOutcome::failure("Failed to enable two-factor authentication")
            }
        }
    }

    #[tracing::instrument(name = "AuthEngine::disable_two_factor", skip_all, fields(user_id = %user_id))]
    pub async fn disable_two_factor(&self, user_id: UserId) -> SimpleOutcome {
        match self.two_factor().disable(user_id).await {
            Ok(()) => SimpleOutcome::ok("Two-factor authentication disabled successfully"),
            Err(TwoFactorError::UserNotFound) => SimpleOutcome::failure("User not found"),
            Err(e) => {
                tracing::error!(error = %e, "disabling two-factor failed");
                SimpleOutcome::failure("Failed to disable two-factor authentication")
            }
        }
    }

    #[tracing::instrument(name = "AuthEngine::regenerate_backup_codes", skip_all, fields(user_id = %user_id))]
    pub async fn regenerate_backup_codes(&self, user_id: UserId) -> BackupCodesOutcome {
        match self.two_factor().regenerate_backup_codes(user_id).await {
            Ok(codes) => BackupCodesOutcome {
                success: true,
                backup_codes: codes.iter().map(|code| code.as_str().to_string()).collect(),
                message: "Backup codes regenerated successfully".to_string(),
            },
            Err(TwoFactorError::UserNotFound | TwoFactorError::NotEnabled) => {
                BackupCodesOutcome::failure("User not found or 2FA not enabled")
            }
            Err(e) => {
                tracing::error!(error = %e, "backup code regeneration failed");
                BackupCodesOutcome::failure("Failed to regenerate backup codes")
            }
        }
    }

    #[tracing::instrument(name = "AuthEngine::backup_codes", skip_all, fields(user_id = %user_id))]
    pub async fn backup_codes(&self, user_id: UserId) -> BackupCodesOutcome {
        match self.two_factor().backup_codes(user_id).await {
            Ok(codes) => BackupCodesOutcome {
                success: true,
                backup_codes: codes.iter().map(|code| code.as_str().to_string()).collect(),
                message: "Backup codes retrieved successfully".to_string(),
            },
            Err(TwoFactorError::UserNotFound | TwoFactorError::NotEnabled) => {
                BackupCodesOutcome::failure("User not found or 2FA not enabled")
            }
            Err(e) => {
                tracing::error!(error = %e, "backup code retrieval failed");
                BackupCodesOutcome::failure("Failed to get backup codes")
            }
        }
    }

    // ------------------------------------------------------------------
    // Account lifecycle and maintenance
    // ------------------------------------------------------------------

    #[tracing::instrument(name = "AuthEngine::delete_account", skip_all, fields(user_id = %user_id))]
    pub async fn delete_account(&self, user_id: UserId) -> SimpleOutcome {
        let use_case = DeleteAccountUseCase::new(
            self.user_store.clone(),
            self.sessions.clone(),
            self.devices.clone(),
            self.otp_store.clone(),
            self.backup.clone(),
        );

        match use_case.execute(user_id).await {
            Ok(()) => SimpleOutcome::ok("Account deleted successfully"),
            Err(DeleteAccountError::UserNotFound) => SimpleOutcome::failure("User not found"),
            Err(e) => {
                tracing::error!(error = %e, "account deletion failed");
                SimpleOutcome::failure("Failed to delete account")
            }
        }
    }

    /// Expiry sweep across every store. Best effort per store; a failing
    /// store logs and contributes zero to the report.
    #[tracing::instrument(name = "AuthEngine::sweep_expired", skip(self))]
    pub async fn sweep_expired(&self) -> SweepReport {
        let mut report = SweepReport::default();

        match self.sessions.sweep_expired().await {
            Ok(count) => report.sessions = count,
            Err(e) => tracing::error!(error = %e, "session sweep failed"),
        }
        match self.tokens.sweep_expired().await {
            Ok(count) => report.tokens = count,
            Err(e) => tracing::error!(error = %e, "token sweep failed"),
        }
        match self.otp.sweep_expired().await {
            Ok(count) => report.challenges = count,
            Err(e) => tracing::error!(error = %e, "challenge sweep failed"),
        }
        match self.devices.sweep_expired().await {
            Ok(count) => report.devices = count,
            Err(e) => tracing::error!(error = %e, "device sweep failed"),
        }

        report
    }

    fn two_factor(&self) -> TwoFactorUseCase<U, O, B> {
        TwoFactorUseCase::new(
            self.user_store.clone(),
            self.otp_store.clone(),
            self.backup.clone(),
        )
    }
}
