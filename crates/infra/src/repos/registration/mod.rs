mod inmemory;
mod postgres;

use events_api_domain::{Registration, ID};
pub use inmemory::InMemoryRegistrationRepo;
pub use postgres::PostgresRegistrationRepo;

#[async_trait::async_trait]
pub trait IRegistrationRepo: Send + Sync {
    /// Fails when the user already has an active `Registration` for the event
    async fn insert(&self, registration: &Registration) -> anyhow::Result<()>;
    /// The active `Registration` of the user for the event
    async fn find_active(&self, user_id: &ID, event_id: &ID) -> Option<Registration>;
    /// Active `Registration`s of all the given events
    async fn find_by_events(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Registration>>;
    /// Active `Registration`s of the user, oldest first
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Registration>>;
    /// Soft deletes the active `Registration` of the user for the event
    async fn cancel(&self, user_id: &ID, event_id: &ID, deleted: i64) -> Option<Registration>;
}
