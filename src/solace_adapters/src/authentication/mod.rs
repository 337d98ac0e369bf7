pub mod password_hasher;

pub use password_hasher::{compute_password_hash, verify_password_hash};
