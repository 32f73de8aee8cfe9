use super::IRegistrationRepo;
use crate::repos::shared::postgres_repo::found_or_warn;
use events_api_domain::{Registration, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

/// Relies on a unique index over `(user_uid, event_uid) WHERE deleted IS NULL`
/// to reject a second active registration.
pub struct PostgresRegistrationRepo {
    pool: PgPool,
}

impl PostgresRegistrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RegistrationRaw {
    registration_uid: Uuid,
    user_uid: Uuid,
    event_uid: Uuid,
    created: i64,
    deleted: Option<i64>,
}

impl From<RegistrationRaw> for Registration {
    fn from(raw: RegistrationRaw) -> Self {
        Self {
            id: raw.registration_uid.into(),
            user_id: raw.user_uid.into(),
            event_id: raw.event_uid.into(),
            created: raw.created,
            deleted: raw.deleted,
        }
    }
}

#[async_trait::async_trait]
impl IRegistrationRepo for PostgresRegistrationRepo {
    async fn insert(&self, registration: &Registration) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO registrations(registration_uid, user_uid, event_uid, created, deleted)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(registration.id.inner_ref())
        .bind(registration.user_id.inner_ref())
        .bind(registration.event_id.inner_ref())
        .bind(registration.created)
        .bind(registration.deleted)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active(&self, user_id: &ID, event_id: &ID) -> Option<Registration> {
        let res = sqlx::query_as::<_, RegistrationRaw>(
            r#"
            SELECT * FROM registrations AS r
            WHERE r.user_uid = $1 AND r.event_uid = $2 AND r.deleted IS NULL
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await;
        found_or_warn(res, "Find active registration").map(|r| r.into())
    }

    async fn find_by_events(&self, event_ids: &[ID]) -> anyhow::Result<Vec<Registration>> {
        let ids = event_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let registrations = sqlx::query_as::<_, RegistrationRaw>(
            r#"
            SELECT * FROM registrations AS r
            WHERE r.event_uid = ANY($1) AND r.deleted IS NULL
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations.into_iter().map(|r| r.into()).collect())
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, RegistrationRaw>(
            r#"
            SELECT * FROM registrations AS r
            WHERE r.user_uid = $1 AND r.deleted IS NULL
            ORDER BY r.created
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations.into_iter().map(|r| r.into()).collect())
    }

    async fn cancel(&self, user_id: &ID, event_id: &ID, deleted: i64) -> Option<Registration> {
        let res = sqlx::query_as::<_, RegistrationRaw>(
            r#"
            UPDATE registrations SET deleted = $3
            WHERE user_uid = $1 AND event_uid = $2 AND deleted IS NULL
            RETURNING *
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(event_id.inner_ref())
        .bind(deleted)
        .fetch_optional(&self.pool)
        .await;
        found_or_warn(res, "Cancel registration").map(|r| r.into())
    }
}
