use crate::error::EventsApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use events_api_api_structs::delete_event::*;
use events_api_domain::{Event, ID};
use events_api_infra::EventsContext;

pub async fn delete_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<EventsContext>,
) -> Result<HttpResponse, EventsApiError> {
    let usecase = DeleteEventUseCase {
        event_id: path_params.event_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(EventsApiError::from)
}

/// Soft deletes the `Event`. Deleted events no longer get reminders
#[derive(Debug)]
pub struct DeleteEventUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for EventsApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteEventUseCase {
    type Response = Event;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteEvent";

    async fn execute(&mut self, ctx: &EventsContext) -> Result<Self::Response, Self::Error> {
        let deleted = ctx.sys.get_timestamp_millis();
        ctx.repos
            .events
            .delete(&self.event_id, deleted)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))
    }
}
