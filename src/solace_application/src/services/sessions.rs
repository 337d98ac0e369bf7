use chrono::Duration;
use solace_core::{
    OpaqueToken, Session, SessionIdentity, SessionStore, SessionStoreError, UserId, UserStore,
    UserStoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum VerifySessionError {
    #[error("Invalid or expired session")]
    Invalid,
    #[error("Session store error: {0}")]
    Store(#[from] SessionStoreError),
    #[error("User store error: {0}")]
    UserStore(UserStoreError),
}

/// Bearer-session component. `verify` is the single source of truth for
/// both the request/response API and the real-time gateway handshake: same
/// token, same instant, same answer.
#[derive(Clone)]
pub struct SessionVerifier<S, U>
where
    S: SessionStore,
    U: UserStore,
{
    session_store: S,
    user_store: U,
    session_ttl: Duration,
}

impl<S, U> SessionVerifier<S, U>
where
    S: SessionStore,
    U: UserStore,
{
    pub fn new(session_store: S, user_store: U, session_ttl: Duration) -> Self {
        Self {
            session_store,
            user_store,
            session_ttl,
        }
    }

    #[tracing::instrument(name = "SessionVerifier::issue", skip(self))]
    pub async fn issue(&self, user_id: UserId) -> Result<OpaqueToken, SessionStoreError> {
        let session = Session::issue(user_id, self.session_ttl);
        let token = session.token.clone();
        self.session_store.insert(session).await?;
        Ok(token)
    }

    /// Read-only verification: no renewal, no deletion, no other side
    /// effects. An expired record answers `Invalid` and is left for
    /// `sweep_expired`.
    #[tracing::instrument(name = "SessionVerifier::verify", skip_all)]
    pub async fn verify(&self, token: &OpaqueToken) -> Result<SessionIdentity, VerifySessionError> {
        let session = self
            .session_store
            .get(token)
            .await?
            .ok_or(VerifySessionError::Invalid)?;

        if session.is_expired() {
            return Err(VerifySessionError::Invalid);
        }

        let user = self
            .user_store
            .get_user_by_id(session.user_id)
            .await
            .map_err(|e| match e {
                // A session whose user vanished is indistinguishable from an
                // invalid one to callers.
                UserStoreError::UserNotFound => VerifySessionError::Invalid,
                other => VerifySessionError::UserStore(other),
            })?;

        Ok(SessionIdentity {
            user_id: user.id,
            email: user.email,
            role: user.role,
            email_verified: user.email_verified,
            two_factor_enabled: user.two_factor_enabled,
        })
    }

    /// Logout. Returns whether a session was actually removed.
    #[tracing::instrument(name = "SessionVerifier::revoke", skip_all)]
    pub async fn revoke(&self, token: &OpaqueToken) -> Result<bool, SessionStoreError> {
        self.session_store.remove(token).await
    }

    /// Forced re-auth: drops every session the user holds.
    #[tracing::instrument(name = "SessionVerifier::revoke_all_for_user", skip(self))]
    pub async fn revoke_all_for_user(&self, user_id: UserId) -> Result<usize, SessionStoreError> {
        self.session_store.remove_all_for_user(user_id).await
    }

    pub async fn sweep_expired(&self) -> Result<usize, SessionStoreError> {
        self.session_store.sweep_expired().await
    }
}
