use chrono::Duration;
use solace_core::{
    OpaqueToken, SingleUseToken, SingleUseTokenStore, TokenPurpose, TokenStoreError, TokenSubject,
};

/// Error surface of `redeem`. `NotFound` deliberately covers both unknown
/// and already-used tokens; a caller cannot tell the difference and the
/// distinction would leak redemption history.
#[derive(Debug, thiserror::Error)]
pub enum RedeemError {
    #[error("Token not found or already used")]
    NotFound,
    #[error("Token has expired")]
    Expired,
    #[error("Token store error: {0}")]
    Store(#[from] TokenStoreError),
}

/// Single-use expiring token primitive shared by the email-verification,
/// password-reset and temporary-2FA flows.
#[derive(Clone)]
pub struct TokenLifecycle<S>
where
    S: SingleUseTokenStore,
{
    store: S,
}

impl<S> TokenLifecycle<S>
where
    S: SingleUseTokenStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Issues a fresh token, invalidating any live token for the same
    /// (subject, purpose).
    #[tracing::instrument(name = "TokenLifecycle::issue", skip(self, subject))]
    pub async fn issue(
        &self,
        subject: TokenSubject,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<OpaqueToken, TokenStoreError> {
        let record = SingleUseToken::issue(subject, purpose, ttl);
        let token = record.token.clone();
        self.store.put(record).await?;
        Ok(token)
    }

    /// Redeems exactly once. The store's atomic `take` removes the record
    /// before expiry is judged, so a concurrent second redemption sees
    /// `NotFound` and an expired token is gone after its first attempt.
    #[tracing::instrument(name = "TokenLifecycle::redeem", skip_all)]
    pub async fn redeem(
        &self,
        token: &OpaqueToken,
        purpose: TokenPurpose,
    ) -> Result<TokenSubject, RedeemError> {
        let record = self.store.take(token).await?.ok_or(RedeemError::NotFound)?;

        if record.purpose != purpose {
            // Wrong-purpose redemption behaves like an unknown token. The
            // record was consumed by the take; that is intentional, a token
            // presented to the wrong flow is spent either way.
            return Err(RedeemError::NotFound);
        }
        if record.is_expired() {
            return Err(RedeemError::Expired);
        }

        Ok(record.subject)
    }

    /// Non-consuming validity check for the temporary-2FA token, which must
    /// survive wrong code attempts until the code itself is right.
    pub async fn peek(
        &self,
        token: &OpaqueToken,
        purpose: TokenPurpose,
    ) -> Result<TokenSubject, RedeemError> {
        let record = self.store.get(token).await?.ok_or(RedeemError::NotFound)?;
        if record.purpose != purpose {
            return Err(RedeemError::NotFound);
        }
        if record.is_expired() {
            return Err(RedeemError::Expired);
        }
        Ok(record.subject)
    }

    /// Consumes a previously peeked token. Returns `NotFound` if a racing
    /// caller got there first.
    pub async fn consume(&self, token: &OpaqueToken) -> Result<(), RedeemError> {
        self.store
            .take(token)
            .await?
            .map(|_| ())
            .ok_or(RedeemError::NotFound)
    }

    pub async fn sweep_expired(&self) -> Result<usize, TokenStoreError> {
        self.store.sweep_expired().await
    }
}
