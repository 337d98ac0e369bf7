use solace_core::{
    OpaqueToken, Password, SingleUseTokenStore, TokenPurpose, TokenStoreError, UserStore,
    UserStoreError,
};

use crate::services::token_lifecycle::{RedeemError, TokenLifecycle};

#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    #[error("Invalid or already used reset token")]
    InvalidToken,
    #[error("Reset token has expired")]
    TokenExpired,
    #[error("User store error: {0}")]
    UserStore(#[from] UserStoreError),
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),
}

/// Password reset: redeem the single-use token, set the new password.
///
/// Existing sessions are left alone here; only `change_password` forces a
/// re-auth.
pub struct ResetPasswordUseCase<U, T>
where
    U: UserStore,
    T: SingleUseTokenStore,
{
    user_store: U,
    tokens: TokenLifecycle<T>,
}

impl<U, T> ResetPasswordUseCase<U, T>
where
    U: UserStore,
    T: SingleUseTokenStore,
{
    pub fn new(user_store: U, tokens: TokenLifecycle<T>) -> Self {
        Self { user_store, tokens }
    }

    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        token: &OpaqueToken,
        new_password: Password,
    ) -> Result<(), ResetPasswordError> {
        let subject = self
            .tokens
            .redeem(token, TokenPurpose::PasswordReset)
            .await
            .map_err(|e| match e {
                RedeemError::NotFound => ResetPasswordError::InvalidToken,
                RedeemError::Expired => ResetPasswordError::TokenExpired,
                RedeemError::Store(inner) => ResetPasswordError::TokenStore(inner),
            })?;

        let user_id = subject.user_id().ok_or(ResetPasswordError::InvalidToken)?;
        self.user_store.set_password(user_id, new_password).await?;
        Ok(())
    }
}
