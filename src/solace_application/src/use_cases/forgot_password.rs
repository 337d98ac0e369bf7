use chrono::Duration;
use solace_core::{
    Email, MailClient, SingleUseTokenStore, TokenPurpose, TokenStoreError, TokenSubject,
    UserStore, UserStoreError,
};

use crate::services::token_lifecycle::TokenLifecycle;

#[derive(Debug, thiserror::Error)]
pub enum ForgotPasswordError {
    #[error("User store error: {0}")]
    UserStore(UserStoreError),
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

/// Forgot-password: issue a reset token for the account behind the email.
///
/// An unknown email succeeds silently; the answer must not reveal whether
/// an account exists.
pub struct ForgotPasswordUseCase<U, T, M>
where
    U: UserStore,
    T: SingleUseTokenStore,
    M: MailClient,
{
    user_store: U,
    tokens: TokenLifecycle<T>,
    mail_client: M,
    reset_token_ttl: Duration,
}

impl<U, T, M> ForgotPasswordUseCase<U, T, M>
where
    U: UserStore,
    T: SingleUseTokenStore,
    M: MailClient,
{
    pub fn new(
        user_store: U,
        tokens: TokenLifecycle<T>,
        mail_client: M,
        reset_token_ttl: Duration,
    ) -> Self {
        Self {
            user_store,
            tokens,
            mail_client,
            reset_token_ttl,
        }
    }

    #[tracing::instrument(name = "ForgotPasswordUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email) -> Result<(), ForgotPasswordError> {
        let user = match self.user_store.get_user(&email).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => return Ok(()),
            Err(other) => return Err(ForgotPasswordError::UserStore(other)),
        };

        let token = self
            .tokens
            .issue(
                TokenSubject::User(user.id),
                TokenPurpose::PasswordReset,
                self.reset_token_ttl,
            )
            .await?;

        if let Err(e) = self
            .mail_client
            .send_email(&email, "Reset your password", token.as_str())
            .await
        {
            tracing::warn!(error = %e, "failed to dispatch password reset email");
        }

        Ok(())
    }
}
