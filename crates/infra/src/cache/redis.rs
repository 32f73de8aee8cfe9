use super::ICache;
use redis::aio::ConnectionManager;
use std::time::Duration;

pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(connection_string: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(connection_string)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }
}

/// Redis expiry has a granularity of seconds
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait::async_trait]
impl ICache for RedisCache {
    async fn exists(&self, key: &str) -> anyhow::Result<bool> {
        let mut connection = self.connection.clone();
        let count: i64 = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut connection)
            .await?;
        Ok(count > 0)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()> {
        let mut connection = self.connection.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs(ttl))
            .query_async::<_, ()>(&mut connection)
            .await?;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<bool> {
        let mut connection = self.connection.clone();
        // Replies nil instead of OK when the key is already present
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs(ttl))
            .query_async(&mut connection)
            .await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let mut connection = self.connection.clone();
        redis::cmd("DEL")
            .arg(key)
            .query_async::<_, i64>(&mut connection)
            .await?;
        Ok(())
    }
}
