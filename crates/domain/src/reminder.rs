use crate::shared::entity::ID;
use crate::timespan::TimeSpan;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(60 * 60);
const MINUTE: Duration = Duration::from_secs(60);

/// The categories of reminders attendees receive before an `Event`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowKind {
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[serde(rename = "1h")]
    OneHour,
}

impl WindowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwentyFourHours => "24h",
            Self::OneHour => "1h",
        }
    }
}

impl Display for WindowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides which `Event`s are due for a reminder of a given `WindowKind`.
///
/// An `Event` qualifies when it starts within `tolerance` of `now + offset`.
/// Once the reminders of an `Event` are sent, a mark is kept for `mark_ttl`
/// so that later evaluations skip it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderWindow {
    pub kind: WindowKind,
    pub offset: Duration,
    pub tolerance: Duration,
    pub mark_ttl: Duration,
}

impl ReminderWindow {
    pub fn twenty_four_hours() -> Self {
        Self {
            kind: WindowKind::TwentyFourHours,
            offset: HOUR * 24,
            tolerance: MINUTE * 30,
            mark_ttl: HOUR * 48,
        }
    }

    pub fn one_hour() -> Self {
        Self {
            kind: WindowKind::OneHour,
            offset: HOUR,
            tolerance: MINUTE * 10,
            mark_ttl: HOUR * 24,
        }
    }

    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Start times of `Event`s that are due for this reminder at `now_ts`
    pub fn band(&self, now_ts: i64) -> TimeSpan {
        Self::band_for(now_ts, self.offset, self.tolerance)
    }

    pub fn band_for(now_ts: i64, offset: Duration, tolerance: Duration) -> TimeSpan {
        TimeSpan::around(now_ts + millis(offset), millis(tolerance))
    }

    /// Idempotency key marking that this reminder was sent for `event_id`
    pub fn mark_key(&self, event_id: &ID) -> String {
        format!("reminder:{}:{}", self.kind, event_id)
    }

    /// Whether evaluations running `interval` apart leave no start time unchecked
    pub fn covers_interval(&self, interval: Duration) -> bool {
        self.tolerance * 2 >= interval
    }
}

fn millis(duration: Duration) -> i64 {
    duration.as_millis() as i64
}
