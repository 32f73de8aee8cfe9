use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// Someone who can create `Event`s and register for them.
/// The email is also the identity the notifier knows the `User` by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub created: i64,
}

impl User {
    pub fn new(name: String, email: String, created: i64) -> Self {
        Self {
            id: Default::default(),
            name,
            email,
            created,
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
