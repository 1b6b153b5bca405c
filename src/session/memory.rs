use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{SessionId, SessionStore, SessionUser};

struct Entry {
    user: SessionUser,
    expires_at: Instant,
}

/// Process-local session store with a fixed lifetime measured from creation.
pub struct MemorySessionStore {
    ttl: Duration,
    entries: RwLock<HashMap<SessionId, Entry>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &SessionId) -> anyhow::Result<Option<SessionUser>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(id) {
                Some(e) if e.expires_at > now => return Ok(Some(e.user.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        // expired: drop it while we are here
        self.entries.write().await.remove(id);
        debug!(session = ?id, "session expired");
        Ok(None)
    }

    async fn set(&self, id: &SessionId, user: SessionUser) -> anyhow::Result<()> {
        let entry = Entry {
            user,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(id.clone(), entry);
        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> anyhow::Result<()> {
        self.entries.write().await.remove(id);
        Ok(())
    }

    async fn purge_expired(&self) -> anyhow::Result<usize> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn user(name: &str) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            username: name.into(),
            email: format!("{name}@test.com"),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn set_get_destroy() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let id = SessionId::generate().unwrap();
        assert!(store.get(&id).await.unwrap().is_none());

        let alice = user("alice");
        store.set(&id, alice.clone()).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), Some(alice));

        store.destroy(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
        // destroying twice is a no-op
        store.destroy(&id).await.unwrap();
    }

    #[tokio::test]
    async fn expired_sessions_are_invisible_and_purged() {
        let store = MemorySessionStore::new(Duration::ZERO);
        let id = SessionId::generate().unwrap();
        store.set(&id, user("bob")).await.unwrap();
        store
            .set(&SessionId::generate().unwrap(), user("carol"))
            .await
            .unwrap();

        assert!(store.get(&id).await.unwrap().is_none());
        assert_eq!(store.count().await, 1);
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.count().await, 0);
    }
}
