use std::fmt;

use rand::RngCore;

const BACKUP_CODE_BYTES: usize = 5;
const BACKUP_CODE_LENGTH: usize = BACKUP_CODE_BYTES * 2;

#[derive(Debug, thiserror::Error)]
pub enum BackupCodeError {
    #[error("Backup code must be {BACKUP_CODE_LENGTH} hex characters")]
    Malformed,
}

/// Pre-generated recovery code: ten uppercase hex characters, usable in
/// place of a one-time code, consumed exactly once.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BackupCode(String);

impl BackupCode {
    pub fn new() -> Self {
        let mut bytes = [0u8; BACKUP_CODE_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(hex::encode_upper(bytes))
    }

    pub fn parse(candidate: &str) -> Result<Self, BackupCodeError> {
        let normalized = candidate.to_ascii_uppercase();
        if normalized.len() == BACKUP_CODE_LENGTH
            && normalized.chars().all(|c| c.is_ascii_hexdigit())
        {
            Ok(Self(normalized))
        } else {
            Err(BackupCodeError::Malformed)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fresh pool, replacing any previous codes wholesale.
    pub fn generate_pool(count: usize) -> Vec<BackupCode> {
        (0..count).map(|_| BackupCode::new()).collect()
    }
}

impl Default for BackupCode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BackupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BackupCode([redacted])")
    }
}
