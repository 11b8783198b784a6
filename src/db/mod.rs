pub mod redis;
pub mod session;

pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use session::{MemorySessionStore, RedisSessionStore, SessionStore};

#[cfg(test)]
pub use session::MockSessionStore;
