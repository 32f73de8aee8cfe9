use crate::shared::entity::{Entity, ID};
use crate::user::User;
use chrono::prelude::*;
use serde::{Deserialize, Serialize};

/// Format of the event time shown to attendees, e.g. `Monday, January 2, 2006 at 3:04 PM`
const START_TIME_FORMAT: &str = "%A, %B %-d, %Y at %-I:%M %p";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: ID,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Scheduled time of the `Event` in UTC millis
    pub start_ts: i64,
    pub creator_id: ID,
    pub created: i64,
    pub updated: i64,
    pub deleted: Option<i64>,
    /// Registrations resolved to their `User`. Only filled in when
    /// the `Event` is read together with its attendees.
    pub attendees: Vec<Attendee>,
}

/// A `Registration` of an `Event` resolved to the registered `User`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub registration_id: ID,
    pub user: User,
}

impl Event {
    pub fn new(
        title: String,
        description: String,
        location: String,
        start_ts: i64,
        creator_id: ID,
        created: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            title,
            description,
            location,
            start_ts,
            creator_id,
            created,
            updated: created,
            deleted: None,
            attendees: Vec::new(),
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.is_some()
    }

    pub fn has_started(&self, now_ts: i64) -> bool {
        self.start_ts <= now_ts
    }

    /// Human readable start time in UTC
    pub fn formatted_start(&self) -> String {
        match Utc.timestamp_millis_opt(self.start_ts).single() {
            Some(dt) => dt.format(START_TIME_FORMAT).to_string(),
            None => self.start_ts.to_string(),
        }
    }
}

impl Entity for Event {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_at(start_ts: i64) -> Event {
        Event::new(
            "Rust meetup".into(),
            "Talks about async".into(),
            "Oslo".into(),
            start_ts,
            ID::default(),
            0,
        )
    }

    #[test]
    fn formats_start_time_for_humans() {
        let start = Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap();
        let event = event_at(start.timestamp_millis());
        assert_eq!(event.formatted_start(), "Monday, January 2, 2006 at 3:04 PM");

        let start = Utc.with_ymd_and_hms(2024, 11, 23, 9, 30, 0).unwrap();
        let event = event_at(start.timestamp_millis());
        assert_eq!(
            event.formatted_start(),
            "Saturday, November 23, 2024 at 9:30 AM"
        );
    }

    #[test]
    fn new_event_is_active_and_without_attendees() {
        let event = event_at(1000);
        assert!(!event.is_deleted());
        assert!(event.attendees.is_empty());
        assert_eq!(event.created, event.updated);
        assert!(!event.has_started(999));
        assert!(event.has_started(1000));
    }
}
