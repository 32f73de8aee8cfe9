use crate::dtos::UserDTO;
use events_api_domain::{Attendee, Event, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeDTO {
    pub registration_id: ID,
    pub user: UserDTO,
}

impl AttendeeDTO {
    pub fn new(attendee: Attendee) -> Self {
        Self {
            registration_id: attendee.registration_id,
            user: UserDTO::new(attendee.user),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDTO {
    pub id: ID,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_ts: i64,
    pub creator_id: ID,
    pub created: i64,
    pub updated: i64,
    pub attendees: Vec<AttendeeDTO>,
}

impl EventDTO {
    pub fn new(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            location: event.location,
            start_ts: event.start_ts,
            creator_id: event.creator_id,
            created: event.created,
            updated: event.updated,
            attendees: event.attendees.into_iter().map(AttendeeDTO::new).collect(),
        }
    }
}
