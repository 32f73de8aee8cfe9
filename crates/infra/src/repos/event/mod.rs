mod inmemory;
mod postgres;

use events_api_domain::{Event, TimeSpan, ID};
pub use inmemory::InMemoryEventRepo;
pub use postgres::PostgresEventRepo;

/// `Event`s returned by `find`, `find_all` and `find_between` have their attendees loaded
#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    async fn insert(&self, e: &Event) -> anyhow::Result<()>;
    async fn save(&self, e: &Event) -> anyhow::Result<()>;
    /// Finds a non deleted `Event`
    async fn find(&self, event_id: &ID) -> Option<Event>;
    /// All non deleted `Event`s, soonest first
    async fn find_all(&self) -> anyhow::Result<Vec<Event>>;
    /// All non deleted `Event`s starting within `timespan`
    async fn find_between(&self, timespan: &TimeSpan) -> anyhow::Result<Vec<Event>>;
    /// Soft deletes the `Event`
    async fn delete(&self, event_id: &ID, deleted: i64) -> Option<Event>;
}
