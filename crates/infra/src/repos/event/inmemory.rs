use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::{IRegistrationRepo, IUserRepo};
use events_api_domain::{Attendee, Event, TimeSpan, ID};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves attendees through the user and registration repositories,
/// like a join would in a relational store
pub struct InMemoryEventRepo {
    events: std::sync::Mutex<Vec<Event>>,
    users: Arc<dyn IUserRepo>,
    registrations: Arc<dyn IRegistrationRepo>,
}

impl InMemoryEventRepo {
    pub fn new(users: Arc<dyn IUserRepo>, registrations: Arc<dyn IRegistrationRepo>) -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
            users,
            registrations,
        }
    }

    async fn with_attendees(&self, mut events: Vec<Event>) -> anyhow::Result<Vec<Event>> {
        let event_ids = events.iter().map(|e| e.id.clone()).collect::<Vec<_>>();
        let registrations = self.registrations.find_by_events(&event_ids).await?;
        let user_ids = registrations
            .iter()
            .map(|r| r.user_id.clone())
            .collect::<Vec<_>>();
        let users = self
            .users
            .find_many(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect::<HashMap<_, _>>();

        for event in events.iter_mut() {
            event.attendees = registrations
                .iter()
                .filter(|r| r.event_id == event.id)
                .filter_map(|r| {
                    users.get(&r.user_id).map(|user| Attendee {
                        registration_id: r.id.clone(),
                        user: user.clone(),
                    })
                })
                .collect();
        }
        Ok(events)
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<()> {
        let mut e = e.clone();
        e.attendees.clear();
        insert(&e, &self.events);
        Ok(())
    }

    async fn save(&self, e: &Event) -> anyhow::Result<()> {
        let mut e = e.clone();
        e.attendees.clear();
        save(&e, &self.events);
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        let event = find(event_id, &self.events).filter(|e| !e.is_deleted())?;
        self.with_attendees(vec![event]).await.ok()?.pop()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Event>> {
        let mut events = find_by(&self.events, |e| !e.is_deleted());
        events.sort_by_key(|e| e.start_ts);
        self.with_attendees(events).await
    }

    async fn find_between(&self, timespan: &TimeSpan) -> anyhow::Result<Vec<Event>> {
        let events = find_by(&self.events, |e| {
            !e.is_deleted() && timespan.contains(e.start_ts)
        });
        self.with_attendees(events).await
    }

    async fn delete(&self, event_id: &ID, deleted: i64) -> Option<Event> {
        update_many(
            &self.events,
            |e| e.id == *event_id && !e.is_deleted(),
            |e| e.deleted = Some(deleted),
        )
        .into_iter()
        .next()
    }
}
