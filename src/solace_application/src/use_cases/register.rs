use chrono::Duration;
use solace_core::{
    Email, MailClient, NewUser, Password, SingleUseTokenStore, TokenPurpose, TokenStoreError,
    TokenSubject, UserId, UserStore, UserStoreError,
};

use crate::services::token_lifecycle::TokenLifecycle;

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("User with this email already exists")]
    UserAlreadyExists,
    #[error("User store error: {0}")]
    UserStore(UserStoreError),
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

/// Registration: create the user unverified and issue the email-verification
/// token.
pub struct RegisterUseCase<U, T, M>
where
    U: UserStore,
    T: SingleUseTokenStore,
    M: MailClient,
{
    user_store: U,
    tokens: TokenLifecycle<T>,
    mail_client: M,
    verification_token_ttl: Duration,
}

impl<U, T, M> RegisterUseCase<U, T, M>
where
    U: UserStore,
    T: SingleUseTokenStore,
    M: MailClient,
{
    pub fn new(
        user_store: U,
        tokens: TokenLifecycle<T>,
        mail_client: M,
        verification_token_ttl: Duration,
    ) -> Self {
        Self {
            user_store,
            tokens,
            mail_client,
            verification_token_ttl,
        }
    }

    /// Creates the account and dispatches the verification token. The new
    /// user cannot log in until the token is redeemed.
    #[tracing::instrument(name = "RegisterUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email, password: Password) -> Result<UserId, RegisterError> {
        let user = self
            .user_store
            .add_user(NewUser::new(email.clone(), password))
            .await
            .map_err(|e| match e {
                UserStoreError::UserAlreadyExists => RegisterError::UserAlreadyExists,
                other => RegisterError::UserStore(other),
            })?;

        let token = self
            .tokens
            .issue(
                TokenSubject::User(user.id),
                TokenPurpose::EmailVerification,
                self.verification_token_ttl,
            )
            .await?;

        // Delivery is fire-and-forget: the token is issued either way and
        // can be re-sent later.
        if let Err(e) = self
            .mail_client
            .send_email(&email, "Verify your email address", token.as_str())
            .await
        {
            tracing::warn!(error = %e, "failed to dispatch verification email");
        }

        Ok(user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_adapters::email::MockMailClient;
    use solace_adapters::persistence::{DashMapTokenStore, HashMapUserStore};

    fn use_case() -> (
        RegisterUseCase<HashMapUserStore, DashMapTokenStore, MockMailClient>,
        MockMailClient,
    ) {
        let mail = MockMailClient::new();
        (
            RegisterUseCase::new(
                HashMapUserStore::new(),
                TokenLifecycle::new(DashMapTokenStore::new()),
                mail.clone(),
                Duration::hours(1),
            ),
            mail,
        )
    }

    fn email() -> Email {
        Email::try_from("newcomer@example.com".to_string()).unwrap()
    }

    fn password() -> Password {
        Password::try_from("long enough".to_string()).unwrap()
    }

    #[tokio::test]
    async fn registration_dispatches_a_verification_token() {
        let (register, mail) = use_case();
        register.execute(email(), password()).await.unwrap();

        let sent = mail.sent();
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].content.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (register, _) = use_case();
        register.execute(email(), password()).await.unwrap();

        let second = register.execute(email(), password()).await;
        assert!(matches!(second, Err(RegisterError::UserAlreadyExists)));
    }
}
