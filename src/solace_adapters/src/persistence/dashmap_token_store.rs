use std::sync::Arc;

use dashmap::DashMap;

use solace_core::{OpaqueToken, SingleUseToken, SingleUseTokenStore, TokenStoreError};

/// In-memory single-use token store. `DashMap::remove` gives the atomic
/// check-and-invalidate the port contract demands: exactly one caller gets
/// the record back.
#[derive(Default, Clone)]
pub struct DashMapTokenStore {
    tokens: Arc<DashMap<OpaqueToken, SingleUseToken>>,
}

impl DashMapTokenStore {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl SingleUseTokenStore for DashMapTokenStore {
    async fn put(&self, token: SingleUseToken) -> Result<(), TokenStoreError> {
        // One live token per (subject, purpose): drop any predecessor.
        self.tokens
            .retain(|_, existing| {
                existing.subject != token.subject || existing.purpose != token.purpose
            });
        self.tokens.insert(token.token.clone(), token);
        Ok(())
    }

    async fn get(&self, token: &OpaqueToken) -> Result<Option<SingleUseToken>, TokenStoreError> {
        Ok(self.tokens.get(token).map(|entry| entry.value().clone()))
    }

    async fn take(&self, token: &OpaqueToken) -> Result<Option<SingleUseToken>, TokenStoreError> {
        Ok(self.tokens.remove(token).map(|(_, record)| record))
    }

    async fn sweep_expired(&self) -> Result<usize, TokenStoreError> {
        let before = self.tokens.len();
        self.tokens.retain(|_, record| !record.is_expired());
        Ok(before - self.tokens.len())
    }
}
