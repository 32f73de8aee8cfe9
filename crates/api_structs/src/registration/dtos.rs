use events_api_domain::{Registration, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDTO {
    pub id: ID,
    pub user_id: ID,
    pub event_id: ID,
    pub created: i64,
    pub deleted: Option<i64>,
}

impl RegistrationDTO {
    pub fn new(registration: Registration) -> Self {
        Self {
            id: registration.id,
            user_id: registration.user_id,
            event_id: registration.event_id,
            created: registration.created,
            deleted: registration.deleted,
        }
    }
}
