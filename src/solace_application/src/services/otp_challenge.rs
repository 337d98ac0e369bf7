use chrono::Duration;
use solace_core::{
    Email, MailClient, OtpChallengeState, OtpChallengeStore, OtpCode, OtpStoreError, UserId,
};

#[derive(Debug, thiserror::Error)]
pub enum OtpVerifyError {
    #[error("Invalid one-time code")]
    InvalidOtp,
    #[error("One-time code has expired")]
    Expired,
    #[error("OTP store error: {0}")]
    Store(OtpStoreError),
}

/// One-time-code challenge component: issues a short-lived code per user,
/// dispatches it through the mail collaborator, validates exactly once.
#[derive(Clone)]
pub struct OtpChallenge<O, M>
where
    O: OtpChallengeStore,
    M: MailClient,
{
    store: O,
    mail_client: M,
    code_ttl: Duration,
}

impl<O, M> OtpChallenge<O, M>
where
    O: OtpChallengeStore,
    M: MailClient,
{
    pub fn new(store: O, mail_client: M, code_ttl: Duration) -> Self {
        Self {
            store,
            mail_client,
            code_ttl,
        }
    }

    /// Generates and stores a fresh challenge, then dispatches the code.
    /// Any previous challenge is overwritten and its code dies here.
    /// Dispatch failure is reported but never rolls back the stored state.
    #[tracing::instrument(name = "OtpChallenge::issue", skip_all, fields(user_id = %user_id))]
    pub async fn issue(&self, user_id: UserId, recipient: &Email) -> Result<(), OtpIssueError> {
        let challenge = OtpChallengeState::issue(user_id, self.code_ttl);
        let code = challenge.code.clone();

        self.store.put(challenge).await.map_err(OtpIssueError::Store)?;

        self.mail_client
            .send_email(recipient, "Your verification code", code.as_str())
            .await
            .map_err(OtpIssueError::Dispatch)?;

        Ok(())
    }

    /// Exactly-once validation: delegates to the store's atomic
    /// compare-and-remove. A wrong code leaves the challenge standing and
    /// counts a failed attempt; a correct code deletes it in the same step.
    #[tracing::instrument(name = "OtpChallenge::verify", skip_all, fields(user_id = %user_id))]
    pub async fn verify(&self, user_id: UserId, code: &OtpCode) -> Result<(), OtpVerifyError> {
        self.store
            .consume(user_id, code)
            .await
            .map_err(|e| match e {
                OtpStoreError::NoChallenge | OtpStoreError::CodeMismatch => {
                    OtpVerifyError::InvalidOtp
                }
                OtpStoreError::Expired => OtpVerifyError::Expired,
                other => OtpVerifyError::Store(other),
            })
    }

    pub async fn cancel(&self, user_id: UserId) -> Result<(), OtpStoreError> {
        self.store.remove(user_id).await
    }

    pub async fn sweep_expired(&self) -> Result<usize, OtpStoreError> {
        self.store.sweep_expired().await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OtpIssueError {
    #[error("OTP store error: {0}")]
    Store(OtpStoreError),
    #[error("Failed to dispatch one-time code: {0}")]
    Dispatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_adapters::email::MockMailClient;
    use solace_adapters::persistence::DashMapOtpStore;

    fn email() -> Email {
        Email::try_from("member@example.com".to_string()).unwrap()
    }

    fn challenge() -> (OtpChallenge<DashMapOtpStore, MockMailClient>, DashMapOtpStore, MockMailClient)
    {
        let store = DashMapOtpStore::new();
        let mail = MockMailClient::new();
        (
            OtpChallenge::new(store.clone(), mail.clone(), Duration::minutes(5)),
            store,
            mail,
        )
    }

    #[tokio::test]
    async fn issued_code_is_dispatched_and_verifies_once() {
        let (otp, _, mail) = challenge();
        let user = UserId::new();

        otp.issue(user, &email()).await.unwrap();

        let sent = mail.sent();
        assert_eq!(sent.len(), 1);
        let code = OtpCode::parse(&sent[0].content).unwrap();

        assert!(otp.verify(user, &code).await.is_ok());
        // Single use: the same code is invalid afterwards.
        assert!(matches!(
            otp.verify(user, &code).await,
            Err(OtpVerifyError::InvalidOtp)
        ));
    }

    #[tokio::test]
    async fn wrong_code_leaves_challenge_standing() {
        let (otp, _, mail) = challenge();
        let user = UserId::new();

        otp.issue(user, &email()).await.unwrap();
        let wrong = OtpCode::parse("000000").unwrap();
        let real = OtpCode::parse(&mail.sent()[0].content).unwrap();

        if wrong != real {
            assert!(matches!(
                otp.verify(user, &wrong).await,
                Err(OtpVerifyError::InvalidOtp)
            ));
        }
        assert!(otp.verify(user, &real).await.is_ok());
    }

    #[tokio::test]
    async fn reissue_invalidates_previous_code() {
        let (otp, _, mail) = challenge();
        let user = UserId::new();

        otp.issue(user, &email()).await.unwrap();
        otp.issue(user, &email()).await.unwrap();

        let sent = mail.sent();
        let first = OtpCode::parse(&sent[0].content).unwrap();
        let second = OtpCode::parse(&sent[1].content).unwrap();

        if first != second {
            assert!(matches!(
                otp.verify(user, &first).await,
                Err(OtpVerifyError::InvalidOtp)
            ));
        }
        assert!(otp.verify(user, &second).await.is_ok());
    }

    #[tokio::test]
    async fn verify_without_challenge_is_invalid() {
        let (otp, _, _) = challenge();
        let result = otp.verify(UserId::new(), &OtpCode::parse("123456").unwrap()).await;
        assert!(matches!(result, Err(OtpVerifyError::InvalidOtp)));
    }
}
