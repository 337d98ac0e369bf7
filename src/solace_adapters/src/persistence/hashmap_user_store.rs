use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use solace_core::{
    CredentialCheck, Email, NewUser, Password, User, UserId, UserStore, UserStoreError,
};

use crate::authentication::{compute_password_hash, verify_password_hash};

/// In-memory reference user store. Passwords are Argon2-hashed on the way
/// in, exactly like a persistent implementation would.
#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<HashMap<Email, User>>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    async fn add_user(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let password_hash = compute_password_hash(new_user.password)
            .await
            .map_err(UserStoreError::Unexpected)?;

        let mut users = self.users.write().await;
        if users.contains_key(&new_user.email) {
            return Err(UserStoreError::UserAlreadyExists);
        }

        let user = User {
            id: UserId::new(),
            email: new_user.email.clone(),
            password_hash,
            role: new_user.role,
            email_verified: false,
            two_factor_enabled: false,
        };
        users.insert(new_user.email, user.clone());
        Ok(user)
    }

    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users.get(email).cloned().ok_or(UserStoreError::UserNotFound)
    }

    async fn get_user_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .values()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn verify_credentials(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<CredentialCheck, UserStoreError> {
        let user = self.get_user(email).await?;

        verify_password_hash(user.password_hash.clone(), password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)?;

        Ok(CredentialCheck {
            user_id: user.id,
            role: user.role,
            email_verified: user.email_verified,
            two_factor_enabled: user.two_factor_enabled,
        })
    }

    async fn set_email_verified(&self, id: UserId) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|user| user.id == id)
            .ok_or(UserStoreError::UserNotFound)?;
        user.email_verified = true;
        Ok(())
    }

    async fn set_password(&self, id: UserId, new_password: Password) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(UserStoreError::Unexpected)?;

        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|user| user.id == id)
            .ok_or(UserStoreError::UserNotFound)?;
        user.password_hash = password_hash;
        Ok(())
    }

    async fn set_two_factor_enabled(
        &self,
        id: UserId,
        enabled: bool,
    ) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .values_mut()
            .find(|user| user.id == id)
            .ok_or(UserStoreError::UserNotFound)?;
        user.two_factor_enabled = enabled;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let email = users
            .iter()
            .find(|(_, user)| user.id == id)
            .map(|(email, _)| email.clone())
            .ok_or(UserStoreError::UserNotFound)?;
        users.remove(&email);
        Ok(())
    }
}
