use solace_core::{
    OpaqueToken, SingleUseTokenStore, TokenPurpose, TokenStoreError, UserStore, UserStoreError,
};

use crate::services::token_lifecycle::{RedeemError, TokenLifecycle};

#[derive(Debug, thiserror::Error)]
pub enum VerifyEmailError {
    #[error("Invalid verification token")]
    InvalidToken,
    #[error("Verification token has expired")]
    TokenExpired,
    #[error("User store error: {0}")]
    UserStore(#[from] UserStoreError),
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

/// Email verification: redeem the single-use token and flip the user's
/// verified flag.
pub struct VerifyEmailUseCase<U, T>
where
    U: UserStore,
    T: SingleUseTokenStore,
{
    user_store: U,
    tokens: TokenLifecycle<T>,
}

impl<U, T> VerifyEmailUseCase<U, T>
where
    U: UserStore,
    T: SingleUseTokenStore,
{
    pub fn new(user_store: U, tokens: TokenLifecycle<T>) -> Self {
        Self { user_store, tokens }
    }

    #[tracing::instrument(name = "VerifyEmailUseCase::execute", skip_all)]
    pub async fn execute(&self, token: &OpaqueToken) -> Result<(), VerifyEmailError> {
        let subject = self
            .tokens
            .redeem(token, TokenPurpose::EmailVerification)
            .await
            .map_err(|e| match e {
                RedeemError::NotFound => VerifyEmailError::InvalidToken,
                RedeemError::Expired => VerifyEmailError::TokenExpired,
                RedeemError::Store(inner) => VerifyEmailError::TokenStore(inner),
            })?;

        let user_id = subject.user_id().ok_or(VerifyEmailError::InvalidToken)?;
        self.user_store.set_email_verified(user_id).await?;
        Ok(())
    }
}
