use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// Pairs a `User` with an `Event` they attend.
///
/// There is at most one active (not deleted) `Registration` per user and event,
/// cancelled ones are kept around with `deleted` set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: ID,
    pub user_id: ID,
    pub event_id: ID,
    pub created: i64,
    pub deleted: Option<i64>,
}

impl Registration {
    pub fn new(user_id: ID, event_id: ID, created: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            event_id,
            created,
            deleted: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.deleted.is_none()
    }

    pub fn is_for(&self, user_id: &ID, event_id: &ID) -> bool {
        self.user_id == *user_id && self.event_id == *event_id
    }
}

impl Entity for Registration {
    fn id(&self) -> &ID {
        &self.id
    }
}
