use std::fmt;

use chrono::{DateTime, Utc};
use rand::RngCore;
use uuid::Uuid;

use super::user::UserId;

const DEVICE_TOKEN_RANDOM_BYTES: usize = 32;

/// Long-lived 2FA-bypass token bound to one device and one user.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DeviceToken(String);

impl DeviceToken {
    /// UUID prefix plus 32 CSPRNG bytes, hex encoded.
    pub fn generate() -> Self {
        let mut bytes = [0u8; DEVICE_TOKEN_RANDOM_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(format!("{}{}", Uuid::new_v4().simple(), hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DeviceToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeviceToken([redacted])")
    }
}

/// A device the user chose to trust after completing a 2FA step.
#[derive(Debug, Clone)]
pub struct TrustedDevice {
    pub user_id: UserId,
    pub token: DeviceToken,
    pub name: String,
    pub device_type: Option<String>,
    pub ip_address: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

impl TrustedDevice {
    pub fn issue(
        user_id: UserId,
        name: String,
        device_type: Option<String>,
        ip_address: Option<String>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            user_id,
            token: DeviceToken::generate(),
            name,
            device_type,
            ip_address,
            expires_at: Utc::now() + ttl,
            last_used: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
