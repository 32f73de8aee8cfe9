use events_api_domain::{ReminderWindow, WindowKind};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_NOVU_API_URL: &str = "https://api.novu.co";

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Postgres connection string. In memory repositories are used when missing
    pub database_url: Option<String>,
    /// Redis connection string for the idempotency cache.
    /// An in memory cache is used when missing
    pub redis_url: Option<String>,
    /// Credentials for the Novu notification api.
    /// Notifications are only logged when missing
    pub novu: Option<NovuConfig>,
    /// Reminders sent the day before an `Event`
    pub reminders_24h: ReminderJobConfig,
    /// Reminders sent the hour before an `Event`
    pub reminders_1h: ReminderJobConfig,
    /// Maximum number of notifications in flight per reminder run
    pub notifier_concurrency: usize,
    pub workflows: WorkflowIds,
}

#[derive(Debug, Clone)]
pub struct NovuConfig {
    pub secret_key: String,
    pub api_url: String,
}

/// A reminder job evaluates its `ReminderWindow` every `interval`
#[derive(Debug, Clone)]
pub struct ReminderJobConfig {
    pub window: ReminderWindow,
    pub interval: Duration,
}

/// Notifier workflows triggered by the service
#[derive(Debug, Clone)]
pub struct WorkflowIds {
    pub welcome: String,
    pub reminder_24h: String,
    pub reminder_1h: String,
    pub registration: String,
    pub cancellation: String,
}

impl WorkflowIds {
    pub fn for_window(&self, kind: WindowKind) -> &str {
        match kind {
            WindowKind::TwentyFourHours => &self.reminder_24h,
            WindowKind::OneHour => &self.reminder_1h,
        }
    }
}

impl Default for WorkflowIds {
    fn default() -> Self {
        Self {
            welcome: "welcome-email".into(),
            reminder_24h: "event-24h-reminder".into(),
            reminder_1h: "event-1h-reminder".into(),
            registration: "event-registration-success-email".into(),
            cancellation: "event-registration-cancellation-email".into(),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn parse_env_var<T: FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match env_var(key) {
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    key, value, default
                );
                default
            }
        },
        None => default,
    }
}

fn minutes_env_var(key: &str, default_minutes: u64) -> Duration {
    let minutes = parse_env_var(key, default_minutes);
    if minutes == 0 {
        warn!(
            "{} must be at least one minute, falling back to the default: {}.",
            key, default_minutes
        );
        return Duration::from_secs(default_minutes * 60);
    }
    Duration::from_secs(minutes * 60)
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env_var::<usize>("PORT", 5000);

        let novu = match env_var("NOVU_SECRET_KEY") {
            Some(secret_key) => Some(NovuConfig {
                secret_key,
                api_url: env_var("NOVU_API_URL").unwrap_or_else(|| DEFAULT_NOVU_API_URL.into()),
            }),
            None => {
                info!("Did not find NOVU_SECRET_KEY environment variable. Notifications will only be logged.");
                None
            }
        };

        let reminders_24h = ReminderJobConfig {
            window: ReminderWindow::twenty_four_hours()
                .with_tolerance(minutes_env_var("REMINDER_24H_TOLERANCE_MINUTES", 30)),
            interval: minutes_env_var("REMINDER_24H_INTERVAL_MINUTES", 60),
        };
        let reminders_1h = ReminderJobConfig {
            window: ReminderWindow::one_hour()
                .with_tolerance(minutes_env_var("REMINDER_1H_TOLERANCE_MINUTES", 10)),
            interval: minutes_env_var("REMINDER_1H_INTERVAL_MINUTES", 10),
        };

        let default_workflows = WorkflowIds::default();
        let workflows = WorkflowIds {
            welcome: env_var("WORKFLOW_WELCOME").unwrap_or(default_workflows.welcome),
            reminder_24h: env_var("WORKFLOW_REMINDER_24H").unwrap_or(default_workflows.reminder_24h),
            reminder_1h: env_var("WORKFLOW_REMINDER_1H").unwrap_or(default_workflows.reminder_1h),
            registration: env_var("WORKFLOW_REGISTRATION")
                .unwrap_or(default_workflows.registration),
            cancellation: env_var("WORKFLOW_CANCELLATION")
                .unwrap_or(default_workflows.cancellation),
        };

        Self {
            port,
            database_url: env_var("DATABASE_URL"),
            redis_url: env_var("REDIS_URL"),
            novu,
            reminders_24h,
            reminders_1h,
            notifier_concurrency: parse_env_var::<usize>("NOTIFIER_CONCURRENCY", 8).max(1),
            workflows,
        }
    }

    pub fn reminder_jobs(&self) -> Vec<&ReminderJobConfig> {
        vec![&self.reminders_24h, &self.reminders_1h]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
