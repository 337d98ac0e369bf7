use solace_core::{
    Password, SessionStore, SessionStoreError, UserId, UserStore, UserStoreError,
};

use crate::services::sessions::SessionVerifier;

#[derive(Debug, thiserror::Error)]
pub enum ChangePasswordError {
    #[error("Current password is incorrect")]
    IncorrectPassword,
    #[error("User not found")]
    UserNotFound,
    #[error("User store error: {0}")]
    UserStore(UserStoreError),
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),
}

/// Authenticated password change. On success every existing session of the
/// user is revoked; the caller logs in again with the new password.
pub struct ChangePasswordUseCase<U, S>
where
    U: UserStore,
    S: SessionStore,
{
    user_store: U,
    sessions: SessionVerifier<S, U>,
}

impl<U, S> ChangePasswordUseCase<U, S>
where
    U: UserStore,
    S: SessionStore,
{
    pub fn new(user_store: U, sessions: SessionVerifier<S, U>) -> Self {
        Self {
            user_store,
            sessions,
        }
    }

    #[tracing::instrument(name = "ChangePasswordUseCase::execute", skip_all, fields(user_id = %user_id))]
    pub async fn execute(
        &self,
        user_id: UserId,
        current_password: Password,
        new_password: Password,
    ) -> Result<(), ChangePasswordError> {
        let user = self
            .user_store
            .get_user_by_id(user_id)
            .await
            .map_err(|e| match e {
                UserStoreError::UserNotFound => ChangePasswordError::UserNotFound,
                other => ChangePasswordError::UserStore(other),
            })?;

        // A wrong current password must leave everything untouched,
        // including the user's live sessions.
        self.user_store
            .verify_credentials(&user.email, &current_password)
            .await
            .map_err(|e| match e {
                UserStoreError::IncorrectPassword | UserStoreError::UserNotFound => {
                    ChangePasswordError::IncorrectPassword
                }
                other => ChangePasswordError::UserStore(other),
            })?;

        self.user_store
            .set_password(user_id, new_password)
            .await
            .map_err(ChangePasswordError::UserStore)?;

        self.sessions.revoke_all_for_user(user_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use solace_adapters::persistence::{DashMapSessionStore, HashMapUserStore};
    use solace_core::{Email, NewUser};

    struct Fixture {
        change: ChangePasswordUseCase<HashMapUserStore, DashMapSessionStore>,
        sessions: SessionVerifier<DashMapSessionStore, HashMapUserStore>,
        users: HashMapUserStore,
        user_id: UserId,
    }

    async fn fixture() -> Fixture {
        let users = HashMapUserStore::new();
        let sessions = SessionVerifier::new(
            DashMapSessionStore::new(),
            users.clone(),
            Duration::hours(1),
        );
        let user = users
            .add_user(NewUser::new(
                Email::try_from("member@example.com".to_string()).unwrap(),
                Password::try_from("old password".to_string()).unwrap(),
            ))
            .await
            .unwrap();

        Fixture {
            change: ChangePasswordUseCase::new(users.clone(), sessions.clone()),
            sessions,
            users,
            user_id: user.id,
        }
    }

    fn password(s: &str) -> Password {
        Password::try_from(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn success_changes_the_hash_and_revokes_sessions() {
        let f = fixture().await;
        let token = f.sessions.issue(f.user_id).await.unwrap();

        f.change
            .execute(f.user_id, password("old password"), password("new password"))
            .await
            .unwrap();

        // Forced re-auth: the pre-change session is gone.
        assert!(f.sessions.verify(&token).await.is_err());

        let email = Email::try_from("member@example.com".to_string()).unwrap();
        assert!(f
            .users
            .verify_credentials(&email, &password("new password"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn wrong_current_password_changes_nothing() {
        let f = fixture().await;
        let token = f.sessions.issue(f.user_id).await.unwrap();

        let result = f
            .change
            .execute(f.user_id, password("not the password"), password("new password"))
            .await;
        assert!(matches!(result, Err(ChangePasswordError::IncorrectPassword)));

        // Stored password unchanged, sessions intact.
        let email = Email::try_from("member@example.com".to_string()).unwrap();
        assert!(f
            .users
            .verify_credentials(&email, &password("old password"))
            .await
            .is_ok());
        assert!(f.sessions.verify(&token).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_user_is_reported() {
        let f = fixture().await;
        let result = f
            .change
            .execute(UserId::new(), password("old password"), password("new password"))
            .await;
        assert!(matches!(result, Err(ChangePasswordError::UserNotFound)));
    }
}
