use super::IRegistrationRepo;
use crate::repos::shared::inmemory_repo::*;
use events_api_domain::{Registration, ID};

pub struct InMemoryRegistrationRepo {
    registrations: std::sync::Mutex<Vec<Registration>>,
}

impl InMemoryRegistrationRepo {
    pub fn new() -> Self {
        Self {
            registrations: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IRegistrationRepo for InMemoryRegistrationRepo {
    async fn insert(&self, registration: &Registration) -> anyhow::Result<()> {
        let inserted = insert_unless(registration, &self.registrations, |r| {
            r.is_active() && r.is_for(&registration.user_id, &registration.event_id)
        });
        if !inserted {
            anyhow::bail!(
                "User {} is already registered for event {}",
                registration.user_id,
                registration.event_id
            );
        }
        Ok(())
    }

    async fn find_active(&self, user_id: &ID, event_id: &ID) -> Option<Registration> {
        find_by(&self.registrations, |r| {
            r.is_active() && r.is_for(user_id, event_id)
        })
        .into_iter()
        .next()
    }

    async fn find_by_events(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Registration>> {
        Ok(find_by(&self.registrations, |r| {
            r.is_active() && event_ids.contains(&r.event_id)
        }))
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Registration>> {
        let mut registrations = find_by(&self.registrations, |r| {
            r.is_active() && r.user_id == *user_id
        });
        registrations.sort_by_key(|r| r.created);
        Ok(registrations)
    }

    async fn cancel(&self, user_id: &ID, event_id: &ID, deleted: i64) -> Option<Registration> {
        update_many(
            &self.registrations,
            |r| r.is_active() && r.is_for(user_id, event_id),
            |r| r.deleted = Some(deleted),
        )
        .into_iter()
        .next()
    }
}
