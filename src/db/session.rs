use std::sync::Mutex;

use crate::{
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::UserSession,
};

/// Where the signed-in session survives restarts
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> AppResult<Option<UserSession>>;

    /// Persists the session, replacing any previous one
    async fn save(&self, session: &UserSession) -> AppResult<()>;

    async fn clear(&self) -> AppResult<()>;

    fn name(&self) -> &'static str;
}

/// Session kept in Redis under one slot key
///
/// Saves and clears go through the cache's background queue, so they are
/// applied in order without delaying the response.
#[derive(Clone)]
pub struct RedisSessionStore {
    cache: Cache,
    key: CacheKey,
    ttl: u64,
}

impl RedisSessionStore {
    pub fn new(cache: Cache, slot: &str, ttl: u64) -> Self {
        Self {
            cache,
            key: CacheKey::Session(slot.to_string()),
            ttl,
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self) -> AppResult<Option<UserSession>> {
        self.cache.get_from_cache(&self.key).await
    }

    async fn save(&self, session: &UserSession) -> AppResult<()> {
        self.cache.set_in_background(&self.key, session, self.ttl);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.cache.delete_in_background(&self.key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

/// Process-local session slot, used without Redis and in tests
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<UserSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> AppResult<std::sync::MutexGuard<'_, Option<UserSession>>> {
        self.session
            .lock()
            .map_err(|_| AppError::Internal("Session store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> AppResult<Option<UserSession>> {
        Ok(self.slot()?.clone())
    }

    async fn save(&self, session: &UserSession) -> AppResult<()> {
        *self.slot()? = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.slot()?.take();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> UserSession {
        serde_json::from_value(json!({
            "id": 5,
            "name": "Meera",
            "email": "meera@example.com"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.save(&session()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session()));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[test]
    fn test_persisted_session_shape() {
        let value = serde_json::to_value(session()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "5",
                "name": "Meera",
                "email": "meera@example.com",
                "isOnboarded": false
            })
        );
    }
}
