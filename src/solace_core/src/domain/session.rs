use chrono::{DateTime, Utc};

use super::{email::Email, role::Role, token::OpaqueToken, user::UserId};

/// Active bearer session. One token resolves to at most one user, ever.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: OpaqueToken,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn issue(user_id: UserId, ttl: chrono::Duration) -> Self {
        Self {
            token: OpaqueToken::generate(),
            user_id,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Identity attached to a verified session, shared verbatim by the
/// request/response API context and the real-time gateway handshake.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    pub user_id: UserId,
    pub email: Email,
    pub role: Role,
    pub email_verified: bool,
    pub two_factor_enabled: bool,
}
