use std::fmt;

use secrecy::Secret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{email::Email, password::Password, role::Role};

/// Opaque user identifier. The engine never interprets it beyond equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User record as the engine sees it. Owned by the persistence layer;
/// fetched per request, never cached across requests.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    /// PHC-format Argon2 hash. Never a cleartext password.
    pub password_hash: Secret<String>,
    pub role: Role,
    pub email_verified: bool,
    pub two_factor_enabled: bool,
}

/// Registration input. The store hashes the password before persisting.
#[derive(Debug)]
pub struct NewUser {
    pub email: Email,
    pub password: Password,
    pub role: Role,
}

impl NewUser {
    pub fn new(email: Email, password: Password) -> Self {
        Self {
            email,
            password,
            role: Role::User,
        }
    }
}

/// Result of a successful credential check: everything the login
/// orchestrator needs to pick its branch, nothing more.
#[derive(Debug, Clone, Copy)]
pub struct CredentialCheck {
    pub user_id: UserId,
    pub role: Role,
    pub email_verified: bool,
    pub two_factor_enabled: bool,
}
