use super::IEventRepo;
use crate::repos::shared::postgres_repo::found_or_warn;
use events_api_domain::{Attendee, Event, TimeSpan, User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::collections::HashMap;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_uid: Uuid,
    title: String,
    description: String,
    location: String,
    start_ts: i64,
    creator_uid: Uuid,
    created: i64,
    updated: i64,
    deleted: Option<i64>,
}

#[derive(Debug, FromRow)]
struct AttendeeRaw {
    registration_uid: Uuid,
    event_uid: Uuid,
    user_uid: Uuid,
    name: String,
    email: String,
    created: i64,
}

impl From<EventRaw> for Event {
    fn from(raw: EventRaw) -> Self {
        Self {
            id: raw.event_uid.into(),
            title: raw.title,
            description: raw.description,
            location: raw.location,
            start_ts: raw.start_ts,
            creator_id: raw.creator_uid.into(),
            created: raw.created,
            updated: raw.updated,
            deleted: raw.deleted,
            attendees: Vec::new(),
        }
    }
}

impl PostgresEventRepo {
    async fn with_attendees(&self, events: Vec<EventRaw>) -> anyhow::Result<Vec<Event>> {
        let ids = events.iter().map(|e| e.event_uid).collect::<Vec<_>>();
        let attendees: Vec<AttendeeRaw> = sqlx::query_as(
            r#"
            SELECT r.registration_uid, r.event_uid, u.user_uid, u.name, u.email, u.created
            FROM registrations AS r
            INNER JOIN users AS u ON u.user_uid = r.user_uid
            WHERE r.event_uid = ANY($1) AND r.deleted IS NULL
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut attendees_by_event: HashMap<Uuid, Vec<Attendee>> = HashMap::new();
        for a in attendees {
            attendees_by_event
                .entry(a.event_uid)
                .or_default()
                .push(Attendee {
                    registration_id: a.registration_uid.into(),
                    user: User {
                        id: a.user_uid.into(),
                        name: a.name,
                        email: a.email,
                        created: a.created,
                    },
                });
        }

        Ok(events
            .into_iter()
            .map(|raw| {
                let attendees = attendees_by_event
                    .remove(&raw.event_uid)
                    .unwrap_or_default();
                let mut event: Event = raw.into();
                event.attendees = attendees;
                event
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events(
                event_uid,
                title,
                description,
                location,
                start_ts,
                creator_uid,
                created,
                updated,
                deleted
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(e.id.inner_ref())
        .bind(&e.title)
        .bind(&e.description)
        .bind(&e.location)
        .bind(e.start_ts)
        .bind(e.creator_id.inner_ref())
        .bind(e.created)
        .bind(e.updated)
        .bind(e.deleted)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, e: &Event) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE events SET
                title = $2,
                description = $3,
                location = $4,
                start_ts = $5,
                updated = $6,
                deleted = $7
            WHERE event_uid = $1
            "#,
        )
        .bind(e.id.inner_ref())
        .bind(&e.title)
        .bind(&e.description)
        .bind(&e.location)
        .bind(e.start_ts)
        .bind(e.updated)
        .bind(e.deleted)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, event_id: &ID) -> Option<Event> {
        let res = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events AS e
            WHERE e.event_uid = $1 AND e.deleted IS NULL
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await;
        let event = found_or_warn(res, "Find event")?;
        let res = self.with_attendees(vec![event]).await.map(|mut e| e.pop());
        found_or_warn(res, "Find event attendees")
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Event>> {
        let events: Vec<EventRaw> = sqlx::query_as(
            r#"
            SELECT * FROM events AS e
            WHERE e.deleted IS NULL
            ORDER BY e.start_ts
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.with_attendees(events).await
    }

    async fn find_between(&self, timespan: &TimeSpan) -> anyhow::Result<Vec<Event>> {
        let events: Vec<EventRaw> = sqlx::query_as(
            r#"
            SELECT * FROM events AS e
            WHERE e.start_ts BETWEEN $1 AND $2 AND e.deleted IS NULL
            "#,
        )
        .bind(timespan.start())
        .bind(timespan.end())
        .fetch_all(&self.pool)
        .await?;

        self.with_attendees(events).await
    }

    async fn delete(&self, event_id: &ID, deleted: i64) -> Option<Event> {
        let res = sqlx::query_as::<_, EventRaw>(
            r#"
            UPDATE events SET deleted = $2
            WHERE event_uid = $1 AND deleted IS NULL
            RETURNING *
            "#,
        )
        .bind(event_id.inner_ref())
        .bind(deleted)
        .fetch_optional(&self.pool)
        .await;
        found_or_warn(res, "Delete event").map(|e| e.into())
    }
}
