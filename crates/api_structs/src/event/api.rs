use crate::dtos::{AttendeeDTO, EventDTO};
use events_api_domain::{Attendee, Event, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event: EventDTO,
}

impl EventResponse {
    pub fn new(event: Event) -> Self {
        Self {
            event: EventDTO::new(event),
        }
    }
}

pub mod create_event {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub location: String,
        pub start_ts: i64,
        pub creator_id: ID,
    }

    pub type APIResponse = EventResponse;
}

pub mod update_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    /// Fields left out keep their current value
    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub location: Option<String>,
        #[serde(default)]
        pub start_ts: Option<i64>,
    }

    pub type APIResponse = EventResponse;
}

pub mod list_events {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub events: Vec<EventDTO>,
    }

    impl APIResponse {
        pub fn new(events: Vec<Event>) -> Self {
            Self {
                events: events.into_iter().map(EventDTO::new).collect(),
            }
        }
    }
}

pub mod get_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = EventResponse;
}

pub mod delete_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    pub type APIResponse = EventResponse;
}

pub mod get_event_attendees {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event_id: ID,
        pub attendees: Vec<AttendeeDTO>,
    }

    impl APIResponse {
        pub fn new(event_id: ID, attendees: Vec<Attendee>) -> Self {
            Self {
                event_id,
                attendees: attendees.into_iter().map(AttendeeDTO::new).collect(),
            }
        }
    }
}
