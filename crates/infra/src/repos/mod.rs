mod event;
mod registration;
mod shared;
mod user;

pub use event::{IEventRepo, InMemoryEventRepo, PostgresEventRepo};
pub use registration::{IRegistrationRepo, InMemoryRegistrationRepo, PostgresRegistrationRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
pub use user::{IUserRepo, InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub events: Arc<dyn IEventRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub registrations: Arc<dyn IRegistrationRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            events: Arc::new(PostgresEventRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            registrations: Arc::new(PostgresRegistrationRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        let users: Arc<dyn IUserRepo> = Arc::new(InMemoryUserRepo::new());
        let registrations: Arc<dyn IRegistrationRepo> = Arc::new(InMemoryRegistrationRepo::new());
        Self {
            events: Arc::new(InMemoryEventRepo::new(
                users.clone(),
                registrations.clone(),
            )),
            users,
            registrations,
        }
    }
}
