use solace_core::{
    DeviceToken, MailClient, OpaqueToken, OtpChallengeStore, OtpCode, SessionStore,
    SessionStoreError, SingleUseTokenStore, TokenPurpose, TokenStoreError, TokenSubject,
    TrustedDeviceStore, UserId, UserStore,
};

use crate::services::{
    otp_challenge::{OtpChallenge, OtpVerifyError},
    sessions::SessionVerifier,
    token_lifecycle::{RedeemError, TokenLifecycle},
    trusted_devices::TrustedDeviceRegistry,
};
use crate::use_cases::login::DeviceMeta;

/// Terminal success of the step-up phase: a real session, plus the device
/// token when the caller opted to trust this device.
#[derive(Debug)]
pub struct StepUpOutcome {
    pub user_id: UserId,
    pub session_token: OpaqueToken,
    pub device_token: Option<DeviceToken>,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyOtpError {
    #[error("Invalid or expired login attempt")]
    InvalidTempToken,
    #[error("Invalid one-time code")]
    InvalidOtp,
    #[error("One-time code has expired")]
    OtpExpired,
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),
    #[error("OTP store error: {0}")]
    OtpStore(solace_core::OtpStoreError),
}

/// OTP_OR_BACKUP_PENDING → AUTHENTICATED on a valid one-time code.
///
/// A wrong code consumes nothing: the temp token and the challenge both
/// stay, the attempt is merely counted. Only a correct code advances the
/// machine, and the code itself is consumed atomically so racing
/// submissions cannot both win.
pub struct VerifyOtpUseCase<U, T, O, D, S, M>
where
    U: UserStore,
    T: SingleUseTokenStore,
    O: OtpChallengeStore,
    D: TrustedDeviceStore,
    S: SessionStore,
    M: MailClient,
{
    tokens: TokenLifecycle<T>,
    otp: OtpChallenge<O, M>,
    devices: TrustedDeviceRegistry<D>,
    sessions: SessionVerifier<S, U>,
}

impl<U, T, O, D, S, M> VerifyOtpUseCase<U, T, O, D, S, M>
where
    U: UserStore,
    T: SingleUseTokenStore,
    O: OtpChallengeStore,
    D: TrustedDeviceStore,
    S: SessionStore,
    M: MailClient,
{
    pub fn new(
        tokens: TokenLifecycle<T>,
        otp: OtpChallenge<O, M>,
        devices: TrustedDeviceRegistry<D>,
        sessions: SessionVerifier<S, U>,
    ) -> Self {
        Self {
            tokens,
            otp,
            devices,
            sessions,
        }
    }

    #[tracing::instrument(name = "VerifyOtpUseCase::execute", skip_all, fields(user_id = %user_id))]
    pub async fn execute(
        &self,
        user_id: UserId,
        code: OtpCode,
        temp_token: OpaqueToken,
        trust_device: Option<DeviceMeta>,
    ) -> Result<StepUpOutcome, VerifyOtpError> {
        check_temp_token(&self.tokens, user_id, &temp_token).await?;

        self.otp.verify(user_id, &code).await.map_err(|e| match e {
            OtpVerifyError::InvalidOtp => VerifyOtpError::InvalidOtp,
            OtpVerifyError::Expired => VerifyOtpError::OtpExpired,
            OtpVerifyError::Store(inner) => VerifyOtpError::OtpStore(inner),
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
    }
}

/// Non-consuming validity check of the temporary token: it must exist, be
/// live, and belong to the stepping-up user.
pub(crate) async fn check_temp_token<T: SingleUseTokenStore>(
    tokens: &TokenLifecycle<T>,
    user_id: UserId,
    temp_token: &OpaqueToken,
) -> Result<(), VerifyOtpError> {
    let subject = tokens
        .peek(temp_token, TokenPurpose::TwoFactorPending)
        .await
        .map_err(|e| match e {
            RedeemError::NotFound | RedeemError::Expired => VerifyOtpError::InvalidTempToken,
            RedeemError::Store(inner) => VerifyOtpError::TokenStore(inner),
        })?;

    if subject != TokenSubject::User(user_id) {
        return Err(VerifyOtpError::InvalidTempToken);
    }
    Ok(())
}

/// Shared tail of both step-up paths: consume the temp token, issue the
/// session, optionally trust the device.
pub(crate) async fn finish_step_up<T, D, S, U>(
    tokens: &TokenLifecycle<T>,
    devices: &TrustedDeviceRegistry<D>,
    sessions: &SessionVerifier<S, U>,
    user_id: UserId,
    temp_token: OpaqueToken,
    trust_device: Option<DeviceMeta>,
) -> Result<StepUpOutcome, VerifyOtpError>
where
    T: SingleUseTokenStore,
    D: TrustedDeviceStore,
    S: SessionStore,
    U: UserStore,
{
    // A racing step-up that already consumed the temp token loses here,
    // even though its code check passed.
    match tokens.consume(&temp_token).await {
        Ok(()) => {}
        Err(RedeemError::NotFound | RedeemError::Expired) => {
            return Err(VerifyOtpError::InvalidTempToken);
        }
        Err(RedeemError::Store(inner)) => return Err(VerifyOtpError::TokenStore(inner)),
    }

    let session_token = sessions.issue(user_id).await?;

    // Trusting the device is best-effort side work; its failure must not
    // undo an authentication that already happened.
    let device_token = match trust_device {
        Some(meta) => match devices
            .trust_device(user_id, meta.name, meta.device_type, meta.ip_address)
            .await
        {
            Ok(device) => Some(device.token),
            Err(e) => {
                tracing::warn!(error = %e, "failed to trust device after step-up");
                None
            }
        },
        None => None,
    };

    Ok(StepUpOutcome {
        user_id,
        session_token,
        device_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use solace_adapters::email::MockMailClient;
    use solace_adapters::persistence::{
        DashMapOtpStore, DashMapSessionStore, DashMapTokenStore, DashMapTrustedDeviceStore,
        HashMapUserStore,
    };
    use solace_core::{Email, NewUser, Password};

    struct Fixture {
        verify: VerifyOtpUseCase<
            HashMapUserStore,
            DashMapTokenStore,
            DashMapOtpStore,
            DashMapTrustedDeviceStore,
            DashMapSessionStore,
            MockMailClient,
        >,
        tokens: TokenLifecycle<DashMapTokenStore>,
        otp: OtpChallenge<DashMapOtpStore, MockMailClient>,
        devices: TrustedDeviceRegistry<DashMapTrustedDeviceStore>,
        mail: MockMailClient,
        user_id: UserId,
        email: Email,
    }

    async fn fixture() -> Fixture {
        let users = HashMapUserStore::new();
        let mail = MockMailClient::new();
        let tokens = TokenLifecycle::new(DashMapTokenStore::new());
        let otp = OtpChallenge::new(DashMapOtpStore::new(), mail.clone(), Duration::minutes(5));
        let devices =
            TrustedDeviceRegistry::new(DashMapTrustedDeviceStore::new(), Duration::days(30));
        let sessions = SessionVerifier::new(
            DashMapSessionStore::new(),
            users.clone(),
            Duration::hours(1),
        );

        let email = Email::try_from("member@example.com".to_string()).unwrap();
        let user = users
            .add_user(NewUser::new(
                email.clone(),
                Password::try_from("correct horse".to_string()).unwrap(),
            ))
            .await
            .unwrap();

        Fixture {
            verify: VerifyOtpUseCase::new(
                tokens.clone(),
                otp.clone(),
                devices.clone(),
                sessions,
            ),
            tokens,
            otp,
            devices,
            mail,
            user_id: user.id,
            email,
        }
    }

    async fn pending_challenge(f: &Fixture) -> (OpaqueToken, OtpCode) {
        let temp_token = f
            .tokens
            .issue(
                TokenSubject::User(f.user_id),
                TokenPurpose::TwoFactorPending,
                Duration::minutes(10),
            )
            .await
            .unwrap();
        f.otp.issue(f.user_id, &f.email).await.unwrap();
        let code = OtpCode::parse(&f.mail.sent().last().unwrap().content).unwrap();
        (temp_token, code)
    }

    #[tokio::test]
    async fn correct_code_yields_a_session_and_spends_the_code() {
        let f = fixture().await;
        let (temp_token, code) = pending_challenge(&f).await;

        let outcome = f
            .verify
            .execute(f.user_id, code.clone(), temp_token.clone(), None)
            .await
            .unwrap();
        assert_eq!(outcome.user_id, f.user_id);
        assert!(outcome.device_token.is_none());

        // Same code again: the challenge is gone, and so is the temp token.
        let replay = f.verify.execute(f.user_id, code, temp_token, None).await;
        assert!(matches!(replay, Err(VerifyOtpError::InvalidTempToken)));
    }

    #[tokio::test]
    async fn wrong_code_does_not_advance_the_state_machine() {
        let f = fixture().await;
        let (temp_token, code) = pending_challenge(&f).await;

        let wrong = OtpCode::parse(if code.as_str() == "000000" { "000001" } else { "000000" })
            .unwrap();
        let result = f
            .verify
            .execute(f.user_id, wrong, temp_token.clone(), None)
            .await;
        assert!(matches!(result, Err(VerifyOtpError::InvalidOtp)));

        // The attempt stays open: the correct code still works afterwards.
        assert!(f
            .verify
            .execute(f.user_id, code, temp_token, None)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn temp_token_of_another_user_is_rejected() {
        let f = fixture().await;
        let (_, code) = pending_challenge(&f).await;
        let foreign = f
            .tokens
            .issue(
                TokenSubject::User(UserId::new()),
                TokenPurpose::TwoFactorPending,
                Duration::minutes(10),
            )
            .await
            .unwrap();

        let result = f.verify.execute(f.user_id, code, foreign, None).await;
        assert!(matches!(result, Err(VerifyOtpError::InvalidTempToken)));
    }

    #[tokio::test]
    async fn expired_temp_token_is_rejected() {
        let f = fixture().await;
        let (_, code) = pending_challenge(&f).await;
        let stale = f
            .tokens
            .issue(
                TokenSubject::User(f.user_id),
                TokenPurpose::TwoFactorPending,
                Duration::seconds(-1),
            )
            .await
            .unwrap();

        let result = f.verify.execute(f.user_id, code, stale, None).await;
        assert!(matches!(result, Err(VerifyOtpError::InvalidTempToken)));
    }

    #[tokio::test]
    async fn opting_in_trusts_the_device() {
        let f = fixture().await;
        let (temp_token, code) = pending_challenge(&f).await;

        let outcome = f
            .verify
            .execute(
                f.user_id,
                code,
                temp_token,
                Some(DeviceMeta {
                    name: "laptop".into(),
                    device_type: Some("desktop".into()),
                    ip_address: Some("203.0.113.7".into()),
                }),
            )
            .await
            .unwrap();

        let device_token = outcome.device_token.expect("device token issued");
        assert!(f.devices.is_trusted(f.user_id, &device_token).await.unwrap());
    }

    #[tokio::test]
    async fn racing_step_ups_produce_exactly_one_session() {
        let f = fixture().await;
        let (temp_token, code) = pending_challenge(&f).await;

        let v1 = f.verify.execute(f.user_id, code.clone(), temp_token.clone(), None);
        let v2 = f.verify.execute(f.user_id, code, temp_token, None);
        let (r1, r2) = tokio::join!(v1, v2);

        let winners = [r1.is_ok(), r2.is_ok()].iter().filter(|&&ok| ok).count();
        assert_eq!(winners, 1);
    }
}
