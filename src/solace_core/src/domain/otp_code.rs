use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;

use super::user::UserId;

const OTP_DIGITS: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum OtpCodeError {
    #[error("One-time code must be exactly {OTP_DIGITS} digits")]
    Malformed,
}

/// Six-digit one-time code, delivered out of band and consumed exactly once.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn new() -> Self {
        let value: u32 = rand::rng().random_range(0..1_000_000);
        Self(format!("{value:06}"))
    }

    pub fn parse(candidate: &str) -> Result<Self, OtpCodeError> {
        if candidate.len() == OTP_DIGITS && candidate.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(OtpCodeError::Malformed)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OtpCode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode([redacted])")
    }
}

/// Pending one-time-code challenge for a user. Re-issuing overwrites this
/// record (last write wins); a wrong code only bumps `failed_attempts`.
#[derive(Debug, Clone)]
pub struct OtpChallengeState {
    pub user_id: UserId,
    pub code: OtpCode,
    pub expires_at: DateTime<Utc>,
    pub failed_attempts: u32,
}

impl OtpChallengeState {
    pub fn issue(user_id: UserId, ttl: chrono::Duration) -> Self {
        Self {
            user_id,
            code: OtpCode::new(),
            expires_at: Utc::now() + ttl,
            failed_attempts: 0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
