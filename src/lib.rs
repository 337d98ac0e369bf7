//! # Solace - Authentication & Session-Trust Engine
//!
//! This is a facade crate that re-exports all public APIs from the engine's
//! component crates. Use this crate to get access to the whole
//! authentication engine in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! solace = { path = "../solace" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `Role`, `OtpCode`, etc.
//! - **Port traits**: `UserStore`, `SessionStore`, `SingleUseTokenStore`, ...
//! - **Use cases**: `LoginUseCase`, `VerifyOtpUseCase`, etc.
//! - **Adapters**: `HashMapUserStore`, `DashMapSessionStore`, `MockMailClient`, etc.
//! - **Engine**: `AuthEngine` - The main entry point for collaborators

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use solace_core::*;
}

// Re-export most commonly used core types at the root level
pub use solace_core::{
    BackupCode, DeviceToken, Email, OpaqueToken, OtpChallengeState, OtpCode, Password, Role,
    Session, SessionIdentity, SingleUseToken, TokenPurpose, TokenSubject, TrustedDevice, User,
    UserId,
};

// ============================================================================
// Port Traits
// ============================================================================

/// Repository and service trait definitions
pub mod ports {
    pub use solace_core::ports::repositories::*;
    pub use solace_core::ports::services::*;
}

// Re-export port traits at root level
pub use solace_core::{
    BackupCodeStore, MailClient, OtpChallengeStore, SessionStore, SingleUseTokenStore,
    TrustedDeviceStore, UserStore,
};

// ============================================================================
// Application Layer (Services + Use Cases)
// ============================================================================

/// Application services and use cases
pub mod application {
    pub use solace_application::*;
}

// Re-export use cases at root level
pub use solace_application::{
    BackupCodes, ChangePasswordUseCase, DeleteAccountUseCase, ForgotPasswordUseCase, LoginUseCase,
    OtpChallenge, RegisterUseCase, ResetPasswordUseCase, SessionVerifier, TokenLifecycle,
    TrustedDeviceRegistry, TwoFactorUseCase, VerifyBackupCodeUseCase, VerifyEmailUseCase,
    VerifyOtpUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use solace_adapters::persistence::*;
    }

    /// Mail client implementations
    pub mod email {
        pub use solace_adapters::email::*;
    }

    /// Password hashing utilities
    pub mod authentication {
        pub use solace_adapters::authentication::*;
    }

    /// Configuration
    pub mod config {
        pub use solace_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use solace_adapters::{
    EngineSettings, MockMailClient,
    persistence::{
        DashMapBackupCodeStore, DashMapOtpStore, DashMapSessionStore, DashMapTokenStore,
        DashMapTrustedDeviceStore, HashMapUserStore,
    },
};

// ============================================================================
// Auth Engine (Main Entry Point)
// ============================================================================

/// Main engine facade
pub use solace_auth_engine::{AuthEngine, HandshakeError, init_tracing};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
