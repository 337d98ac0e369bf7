pub mod backup_codes;
pub mod otp_challenge;
pub mod sessions;
pub mod token_lifecycle;
pub mod trusted_devices;
