use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use solace_core::{OtpChallengeState, OtpChallengeStore, OtpCode, OtpStoreError, UserId};

/// In-memory OTP challenge store. `consume` runs entirely under the entry's
/// shard lock, so compare-and-remove is atomic per user: two racing
/// submissions of the correct code cannot both pass.
#[derive(Default, Clone)]
pub struct DashMapOtpStore {
    challenges: Arc<DashMap<UserId, OtpChallengeState>>,
}

impl DashMapOtpStore {
    pub fn new() -> Self {
        Self {
            challenges: Arc::new(DashMap::new()),
        }
    }

    /// Failed attempts recorded for a user's pending challenge, if any.
    pub fn failed_attempts(&self, user_id: UserId) -> Option<u32> {
        self.challenges
            .get(&user_id)
            .map(|entry| entry.failed_attempts)
    }
}

#[async_trait::async_trait]
impl OtpChallengeStore for DashMapOtpStore {
    async fn put(&self, challenge: OtpChallengeState) -> Result<(), OtpStoreError> {
        self.challenges.insert(challenge.user_id, challenge);
        Ok(())
    }

    async fn consume(&self, user_id: UserId, code: &OtpCode) -> Result<(), OtpStoreError> {
        match self.challenges.entry(user_id) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_expired() {
                    return Err(OtpStoreError::Expired);
                }
                if entry.get().code != *code {
                    entry.get_mut().failed_attempts += 1;
                    return Err(OtpStoreError::CodeMismatch);
                }
                entry.remove();
                Ok(())
            }
            Entry::Vacant(_) => Err(OtpStoreError::NoChallenge),
        }
    }

    async fn remove(&self, user_id: UserId) -> Result<(), OtpStoreError> {
        self.challenges.remove(&user_id);
        Ok(())
    }

    async fn sweep_expired(&self) -> Result<usize, OtpStoreError> {
        let before = self.challenges.len();
        self.challenges.retain(|_, challenge| !challenge.is_expired());
        Ok(before - self.challenges.len())
    }
}
