pub mod env {
    /// Path to a JSON settings file overriding the built-in defaults.
    pub const ENGINE_CONFIG_FILE_ENV_VAR: &str = "SOLACE_AUTH_CONFIG";
    /// Prefix for per-field environment overrides, e.g.
    /// `SOLACE_AUTH_SESSION_TTL_SECS=7200`.
    pub const ENGINE_ENV_PREFIX: &str = "SOLACE_AUTH";
}

pub mod defaults {
    /// Session lifetime: one hour.
    pub const SESSION_TTL_SECS: i64 = 60 * 60;
    /// Temporary 2FA token lifetime: ten minutes.
    pub const TEMP_TOKEN_TTL_SECS: i64 = 10 * 60;
    /// One-time code lifetime: five minutes.
    pub const OTP_TTL_SECS: i64 = 5 * 60;
    /// Email-verification token lifetime: one hour.
    pub const VERIFICATION_TOKEN_TTL_SECS: i64 = 60 * 60;
    /// Password-reset token lifetime: one hour.
    pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;
    /// Trusted-device lifetime: thirty days.
    pub const TRUSTED_DEVICE_TTL_DAYS: i64 = 30;
}
