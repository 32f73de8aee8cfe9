use crate::dtos::RegistrationDTO;
use events_api_domain::{Registration, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub registration: RegistrationDTO,
}

impl RegistrationResponse {
    pub fn new(registration: Registration) -> Self {
        Self {
            registration: RegistrationDTO::new(registration),
        }
    }
}

pub mod register_for_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub user_id: ID,
    }

    pub type APIResponse = RegistrationResponse;
}

pub mod cancel_registration {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
        pub user_id: ID,
    }

    pub type APIResponse = RegistrationResponse;
}

pub mod get_user_registrations {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub user_id: ID,
        pub registrations: Vec<RegistrationDTO>,
    }

    impl APIResponse {
        pub fn new(user_id: ID, registrations: Vec<Registration>) -> Self {
            Self {
                user_id,
                registrations: registrations
                    .into_iter()
                    .map(RegistrationDTO::new)
                    .collect(),
            }
        }
    }
}
