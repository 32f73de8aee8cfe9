use super::ICache;
use crate::system::ISys;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Value and the timestamp it expires at
type Entry = (String, i64);

/// Expiry is measured with the given `ISys` so that tests can move time
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    sys: Arc<dyn ISys>,
}

impl InMemoryCache {
    pub fn new(sys: Arc<dyn ISys>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            sys,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn expires_at(&self, ttl: Duration) -> i64 {
        self.sys.get_timestamp_millis() + ttl.as_millis() as i64
    }

    fn is_live(&self, entry: &Entry) -> bool {
        entry.1 > self.sys.get_timestamp_millis()
    }
}

#[async_trait::async_trait]
impl ICache for InMemoryCache {
    async fn exists(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self
            .entries()
            .get(key)
            .map(|entry| self.is_live(entry))
            .unwrap_or(false))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<()> {
        let entry = (value.to_string(), self.expires_at(ttl));
        self.entries().insert(key.to_string(), entry);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> anyhow::Result<bool> {
        let mut entries = self.entries();
        if let Some(entry) = entries.get(key) {
            if self.is_live(entry) {
                return Ok(false);
            }
        }
        entries.insert(key.to_string(), (value.to_string(), self.expires_at(ttl)));
        Ok(true)
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
