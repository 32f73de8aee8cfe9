use crate::error::EventsApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use events_api_api_structs::get_user_registrations::*;
use events_api_domain::{Registration, ID};
use events_api_infra::EventsContext;

pub async fn get_user_registrations_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<EventsContext>,
) -> Result<HttpResponse, EventsApiError> {
    let usecase = GetUserRegistrationsUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|registrations| {
            HttpResponse::Ok().json(APIResponse::new(
                path_params.user_id.clone(),
                registrations,
            ))
        })
        .map_err(EventsApiError::from)
}

/// Active `Registration`s of a `User`
#[derive(Debug)]
pub struct GetUserRegistrationsUseCase {
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    UserNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for EventsApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => Self::NotFound(format!(
                "The user with id: {}, was not found.",
                user_id
            )),
            UseCaseError::StorageError => Self::Unavailable,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUserRegistrationsUseCase {
    type Response = Vec<Registration>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetUserRegistrations";

    async fn execute(&mut self, ctx: &EventsContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id.clone()));
        }

        ctx.repos
            .registrations
            .find_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
