use chrono::{DateTime, Utc};
use serde::Serialize;

use solace_core::{Role, SessionIdentity, UserId};

/// `{success, message}` envelope shared by most operations. Failures are
/// values, never panics, so callers can branch and render uniformly.
#[derive(Debug, Clone, Serialize)]
pub struct SimpleOutcome {
    pub success: bool,
    pub message: String,
}

impl SimpleOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Result of the credential phase of login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub success: bool,
    #[serde(rename = "requires2FA")]
    pub requires_two_factor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub message: String,
}

impl LoginResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            requires_two_factor: false,
            temp_token: None,
            session_token: None,
            user_id: None,
            message: message.into(),
        }
    }
}

/// Result of a step-up (OTP or backup code) verification.
#[derive(Debug, Clone, Serialize)]
pub struct StepUpResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_token: Option<String>,
    pub message: String,
}

impl StepUpResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            session_token: None,
            device_token: None,
            message: message.into(),
        }
    }
}

/// Identity attached to a valid session, as the API layer consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub email_verified: bool,
    pub two_factor_enabled: bool,
}

impl From<SessionIdentity> for SessionUser {
    fn from(identity: SessionIdentity) -> Self {
        use secrecy::ExposeSecret;
        Self {
            id: identity.user_id,
            email: identity.email.as_ref().expose_secret().clone(),
            role: identity.role,
            email_verified: identity.email_verified,
            two_factor_enabled: identity.two_factor_enabled,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifySessionOutcome {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl VerifySessionOutcome {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            user: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrustDeviceOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub device_token: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrustedDevicesOutcome {
    pub success: bool,
    pub devices: Vec<DeviceInfo>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackupCodesOutcome {
    pub success: bool,
    pub backup_codes: Vec<String>,
    pub message: String,
}

impl BackupCodesOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            backup_codes: Vec::new(),
            message: message.into(),
        }
    }
}

/// Counts removed by one expiry sweep across all stores.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SweepReport {
    pub sessions: usize,
    pub tokens: usize,
    pub challenges: usize,
    pub devices: usize,
}
