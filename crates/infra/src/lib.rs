mod cache;
mod config;
mod repos;
mod services;
mod system;

pub use cache::{ICache, InMemoryCache, RedisCache};
pub use config::{Config, NovuConfig, ReminderJobConfig, WorkflowIds};
pub use repos::{
    IEventRepo, IRegistrationRepo, IUserRepo, InMemoryEventRepo, InMemoryRegistrationRepo,
    InMemoryUserRepo, Repos,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct EventsContext {
    pub repos: Repos,
    /// Holds the reminder marks
    pub cache: Arc<dyn ICache>,
    pub notifier: Arc<dyn INotifier>,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl EventsContext {
    /// Context where every dependency lives in memory and time is real
    pub fn create_inmemory() -> Self {
        Self::create_inmemory_with_sys(Arc::new(RealSys {}))
    }

    pub fn create_inmemory_with_sys(sys: Arc<dyn ISys>) -> Self {
        Self {
            repos: Repos::create_inmemory(),
            cache: Arc::new(InMemoryCache::new(sys.clone())),
            notifier: Arc::new(InMemoryNotifier::new()),
            config: Config::new(),
            sys,
        }
    }

    async fn create(config: Config) -> anyhow::Result<Self> {
        let sys: Arc<dyn ISys> = Arc::new(RealSys {});

        let repos = match &config.database_url {
            Some(database_url) => Repos::create_postgres(database_url).await?,
            None => {
                info!("Did not find DATABASE_URL environment variable. Going to use in memory repositories.");
                Repos::create_inmemory()
            }
        };

        let cache: Arc<dyn ICache> = match &config.redis_url {
            Some(redis_url) => Arc::new(RedisCache::connect(redis_url).await?),
            None => {
                info!("Did not find REDIS_URL environment variable. Going to use an in memory cache.");
                Arc::new(InMemoryCache::new(sys.clone()))
            }
        };

        let notifier: Arc<dyn INotifier> = match &config.novu {
            Some(novu) => Arc::new(NovuNotifier::new(novu)),
            None => Arc::new(LogNotifier),
        };

        Ok(Self {
            repos,
            cache,
            notifier,
            config,
            sys,
        })
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<EventsContext> {
    EventsContext::create(Config::new()).await
}
