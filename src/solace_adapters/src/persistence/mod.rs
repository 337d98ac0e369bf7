pub mod dashmap_backup_code_store;
pub mod dashmap_otp_store;
pub mod dashmap_session_store;
pub mod dashmap_token_store;
pub mod dashmap_trusted_device_store;
pub mod hashmap_user_store;

pub use dashmap_backup_code_store::DashMapBackupCodeStore;
pub use dashmap_otp_store::DashMapOtpStore;
pub use dashmap_session_store::DashMapSessionStore;
pub use dashmap_token_store::DashMapTokenStore;
pub use dashmap_trusted_device_store::DashMapTrustedDeviceStore;
pub use hashmap_user_store::HashMapUserStore;
