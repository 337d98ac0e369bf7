use std::sync::Arc;

use dashmap::DashMap;

use solace_core::{OpaqueToken, Session, SessionStore, SessionStoreError, UserId};

/// In-memory session store. Reads take no locks beyond the shard's; writes
/// are per-token. `get` never mutates; expiry cleanup is `sweep_expired`.
#[derive(Default, Clone)]
pub struct DashMapSessionStore {
    sessions: Arc<DashMap<OpaqueToken, Session>>,
}

impl DashMapSessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for DashMapSessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError> {
        self.sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn get(&self, token: &OpaqueToken) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.get(token).map(|entry| entry.value().clone()))
    }

    async fn remove(&self, token: &OpaqueToken) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.remove(token).is_some())
    }

    async fn remove_all_for_user(&self, user_id: UserId) -> Result<usize, SessionStoreError> {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.user_id != user_id);
        Ok(before - self.sessions.len())
    }

    async fn sweep_expired(&self) -> Result<usize, SessionStoreError> {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired());
        Ok(before - self.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn tokens_resolve_to_their_own_session_only() {
        let store = DashMapSessionStore::new();
        let a = Session::issue(UserId::new(), Duration::hours(1));
        let b = Session::issue(UserId::new(), Duration::hours(1));
        store.insert(a.clone()).await.unwrap();
        store.insert(b.clone()).await.unwrap();

        let got = store.get(&a.token).await.unwrap().unwrap();
        assert_eq!(got.user_id, a.user_id);
        assert_ne!(got.user_id, b.user_id);
    }

    #[tokio::test]
    async fn remove_reports_whether_anything_was_removed() {
        let store = DashMapSessionStore::new();
        let session = Session::issue(UserId::new(), Duration::hours(1));
        let token = session.token.clone();
        store.insert(session).await.unwrap();

        assert!(store.remove(&token).await.unwrap());
        assert!(!store.remove(&token).await.unwrap());
    }

    #[tokio::test]
    async fn remove_all_for_user_spares_other_users() {
        let store = DashMapSessionStore::new();
        let victim = UserId::new();
        let bystander = UserId::new();
        store
            .insert(Session::issue(victim, Duration::hours(1)))
            .await
            .unwrap();
        store
            .insert(Session::issue(victim, Duration::hours(1)))
            .await
            .unwrap();
        let kept = Session::issue(bystander, Duration::hours(1));
        store.insert(kept.clone()).await.unwrap();

        assert_eq!(store.remove_all_for_user(victim).await.unwrap(), 2);
        assert!(store.get(&kept.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_sessions() {
        let store = DashMapSessionStore::new();
        let live = Session::issue(UserId::new(), Duration::hours(1));
        let dead = Session::issue(UserId::new(), Duration::seconds(-1));
        store.insert(live.clone()).await.unwrap();
        store.insert(dead.clone()).await.unwrap();

        assert_eq!(store.sweep_expired().await.unwrap(), 1);
        assert!(store.get(&live.token).await.unwrap().is_some());
        assert!(store.get(&dead.token).await.unwrap().is_none());
    }
}
