use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{email::Email, user::UserId};

const TOKEN_BYTES: usize = 32;

/// Unguessable bearer token. Generated from the OS-seeded CSPRNG; a
/// predictable sequence here would break every single-use guarantee.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpaqueToken(String);

impl OpaqueToken {
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OpaqueToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// Tokens are secrets; keep them out of logs and panic messages.
impl fmt::Debug for OpaqueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueToken([redacted])")
    }
}

/// What a single-use token is allowed to be redeemed for. Redemption with
/// the wrong purpose behaves exactly like an unknown token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
    TwoFactorPending,
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenPurpose::EmailVerification => "email_verification",
            TokenPurpose::PasswordReset => "password_reset",
            TokenPurpose::TwoFactorPending => "two_factor_pending",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSubject {
    Email(Email),
    User(UserId),
}

impl TokenSubject {
    /// Subject as a user id, for the flows that are always user-keyed.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            TokenSubject::User(id) => Some(*id),
            TokenSubject::Email(_) => None,
        }
    }
}

/// Single-use expiring token record. Exactly-once redemption is the store's
/// contract (`SingleUseTokenStore::take`); this type only carries the data.
#[derive(Debug, Clone)]
pub struct SingleUseToken {
    pub token: OpaqueToken,
    pub subject: TokenSubject,
    pub purpose: TokenPurpose,
    pub expires_at: DateTime<Utc>,
}

impl SingleUseToken {
    pub fn issue(subject: TokenSubject, purpose: TokenPurpose, ttl: chrono::Duration) -> Self {
        Self {
            token: OpaqueToken::generate(),
            subject,
            purpose,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
