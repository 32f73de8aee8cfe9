mod inmemory;
mod redis;

pub use self::inmemory::InMemoryCache;
pub use self::redis::RedisCache;
use std::time::Duration;

/// Key value store with expiring entries
#[async_trait::async_trait]
pub trait ICache: Send + Sync {
    async fn exists(&self, key: &str) -> anyhow::Result<bool>;
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()>;
    /// Atomically stores `value` only if `key` is absent.
    /// Returns whether this call stored it.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<bool>;
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}
