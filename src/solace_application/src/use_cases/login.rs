use chrono::Duration;
use solace_core::{
    DeviceStoreError, DeviceToken, Email, MailClient, OpaqueToken, OtpChallengeStore, Password,
    SessionStore, SessionStoreError, SingleUseTokenStore, TokenPurpose, TokenStoreError,
    TokenSubject, TrustedDeviceStore, UserId, UserStore, UserStoreError,
};

use crate::services::{
    otp_challenge::{OtpChallenge, OtpIssueError},
    sessions::SessionVerifier,
    token_lifecycle::TokenLifecycle,
    trusted_devices::TrustedDeviceRegistry,
};

/// Metadata supplied when the caller asks to trust the current device.
#[derive(Debug, Clone)]
pub struct DeviceMeta {
    pub name: String,
    pub device_type: Option<String>,
    pub ip_address: Option<String>,
}

/// Outcome of the credential phase of the state machine.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Terminal success: 2FA disabled, or the presented device token was
    /// trusted for this user.
    Authenticated {
        user_id: UserId,
        session_token: OpaqueToken,
    },
    /// Step-up required: a temporary token was issued and a one-time code
    /// dispatched. No session exists yet.
    TwoFactorRequired {
        user_id: UserId,
        temp_token: OpaqueToken,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Covers unknown email and wrong password alike.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Please verify your email before logging in")]
    EmailNotVerified,
    #[error("User store error: {0}")]
    UserStore(UserStoreError),
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),
    #[error("Trusted device store error: {0}")]
    DeviceStore(#[from] DeviceStoreError),
    #[error("Failed to issue one-time code: {0}")]
    OtpIssue(#[from] OtpIssueError),
}

/// The login orchestrator: CREDENTIALS_PENDING and its outgoing edges.
///
/// Transitions are a pure function of (credential check, email_verified,
/// two_factor_enabled, device-token match); everything else is side effect.
pub struct LoginUseCase<U, T, O, D, S, M>
where
    U: UserStore,
    T: SingleUseTokenStore,
    O: OtpChallengeStore,
    D: TrustedDeviceStore,
    S: SessionStore,
    M: MailClient,
{
    user_store: U,
    tokens: TokenLifecycle<T>,
    otp: OtpChallenge<O, M>,
    devices: TrustedDeviceRegistry<D>,
    sessions: SessionVerifier<S, U>,
    mail_client: M,
    verification_token_ttl: Duration,
    temp_token_ttl: Duration,
}

impl<U, T, O, D, S, M> LoginUseCase<U, T, O, D, S, M>
where
    U: UserStore,
    T: SingleUseTokenStore,
    O: OtpChallengeStore,
    D: TrustedDeviceStore,
    S: SessionStore,
    M: MailClient,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_store: U,
        tokens: TokenLifecycle<T>,
        otp: OtpChallenge<O, M>,
        devices: TrustedDeviceRegistry<D>,
        sessions: SessionVerifier<S, U>,
        mail_client: M,
        verification_token_ttl: Duration,
        temp_token_ttl: Duration,
    ) -> Self {
        Self {
            user_store,
            tokens,
            otp,
            devices,
            sessions,
            mail_client,
            verification_token_ttl,
            temp_token_ttl,
        }
    }

    #[tracing::instrument(name = "LoginUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
        device_token: Option<DeviceToken>,
    ) -> Result<LoginOutcome, LoginError> {
        let check = self
            .user_store
            .verify_credentials(&email, &password)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound | UserStoreError::IncorrectPassword => {
                    LoginError::InvalidCredentials
                }
                other => LoginError::UserStore(other),
            })?;

        if !check.email_verified {
            // Terminal for this attempt: no session. Re-issue the
            // verification token so the user can complete the account.
            let token = self
                .tokens
                .issue(
                    TokenSubject::User(check.user_id),
                    TokenPurpose::EmailVerification,
                    self.verification_token_ttl,
                )
                .await?;
            if let Err(e) = self
                .mail_client
                .send_email(&email, "Verify your email address", token.as_str())
                .await
            {
                tracing::warn!(error = %e, "failed to dispatch verification email");
            }
            return Err(LoginError::EmailNotVerified);
        }

        if check.two_factor_enabled {
            let trusted = match device_token {
                Some(ref token) => self.devices.is_trusted(check.user_id, token).await?,
                None => false,
            };

            if !trusted {
                let temp_token = self
                    .tokens
                    .issue(
                        TokenSubject::User(check.user_id),
                        TokenPurpose::TwoFactorPending,
                        self.temp_token_ttl,
                    )
                    .await?;
                self.otp.issue(check.user_id, &email).await?;

                return Ok(LoginOutcome::TwoFactorRequired {
                    user_id: check.user_id,
                    temp_token,
                });
            }
        }

        let session_token = self.sessions.issue(check.user_id).await?;
        Ok(LoginOutcome::Authenticated {
            user_id: check.user_id,
            session_token,
        })
    }
}
