use chrono::Duration;
use ::config::{Config, Environment, File};
use serde::Deserialize;

use super::constants::{defaults, env};

/// Engine tunables: every TTL the token, session, OTP and device flows use.
/// Loaded from defaults, an optional JSON file and environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    pub session_ttl_secs: i64,
    pub temp_token_ttl_secs: i64,
    pub otp_ttl_secs: i64,
    pub verification_token_ttl_secs: i64,
    pub reset_token_ttl_secs: i64,
    pub trusted_device_ttl_days: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            session_ttl_secs: defaults::SESSION_TTL_SECS,
            temp_token_ttl_secs: defaults::TEMP_TOKEN_TTL_SECS,
            otp_ttl_secs: defaults::OTP_TTL_SECS,
            verification_token_ttl_secs: defaults::VERIFICATION_TOKEN_TTL_SECS,
            reset_token_ttl_secs: defaults::RESET_TOKEN_TTL_SECS,
            trusted_device_ttl_days: defaults::TRUSTED_DEVICE_TTL_DAYS,
        }
    }
}

impl EngineSettings {
    /// Defaults < JSON file (if `SOLACE_AUTH_CONFIG` points at one) <
    /// `SOLACE_AUTH_*` environment variables.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("session_ttl_secs", defaults::SESSION_TTL_SECS)?
            .set_default("temp_token_ttl_secs", defaults::TEMP_TOKEN_TTL_SECS)?
            .set_default("otp_ttl_secs", defaults::OTP_TTL_SECS)?
            .set_default(
                "verification_token_ttl_secs",
                defaults::VERIFICATION_TOKEN_TTL_SECS,
            )?
            .set_default("reset_token_ttl_secs", defaults::RESET_TOKEN_TTL_SECS)?
            .set_default("trusted_device_ttl_days", defaults::TRUSTED_DEVICE_TTL_DAYS)?;

        if let Ok(path) = std::env::var(env::ENGINE_CONFIG_FILE_ENV_VAR) {
            builder = builder.add_source(File::with_name(&path));
        }
        builder = builder.add_source(Environment::with_prefix(env::ENGINE_ENV_PREFIX));

        builder.build()?.try_deserialize()
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::seconds(self.session_ttl_secs)
    }

    pub fn temp_token_ttl(&self) -> Duration {
        Duration::seconds(self.temp_token_ttl_secs)
    }

    pub fn otp_ttl(&self) -> Duration {
        Duration::seconds(self.otp_ttl_secs)
    }

    pub fn verification_token_ttl(&self) -> Duration {
        Duration::seconds(self.verification_token_ttl_secs)
    }

    pub fn reset_token_ttl(&self) -> Duration {
        Duration::seconds(self.reset_token_ttl_secs)
    }

    pub fn trusted_device_ttl(&self) -> Duration {
        Duration::days(self.trusted_device_ttl_days)
    }
}
