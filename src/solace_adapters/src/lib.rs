pub mod authentication;
pub mod config;
pub mod email;
pub mod persistence;

pub use config::EngineSettings;
pub use email::{MockMailClient, SentEmail};
pub use persistence::{
    DashMapBackupCodeStore, DashMapOtpStore, DashMapSessionStore, DashMapTokenStore,
    DashMapTrustedDeviceStore, HashMapUserStore,
};
