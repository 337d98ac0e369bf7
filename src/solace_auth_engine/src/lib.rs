pub mod engine;
pub mod outcomes;
pub mod tracing_setup;

pub use engine::{AuthEngine, HandshakeError};
pub use outcomes::{
    BackupCodesOutcome, DeviceInfo, LoginResult, SessionUser, SimpleOutcome, StepUpResult,
    SweepReport, TrustDeviceOutcome, TrustedDevicesOutcome, VerifySessionOutcome,
};
pub use tracing_setup::init_tracing;
