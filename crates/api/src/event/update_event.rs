use super::subscribers::ClearReminderMarksOnReschedule;
use crate::error::EventsApiError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use events_api_api_structs::update_event::*;
use events_api_domain::{Event, ID};
use events_api_infra::EventsContext;

pub async fn update_event_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<EventsContext>,
) -> Result<HttpResponse, EventsApiError> {
    let body = body.0;
    let usecase = UpdateEventUseCase {
        event_id: path_params.event_id.clone(),
        title: body.title,
        description: body.description,
        location: body.location,
        start_ts: body.start_ts,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.event)))
        .map_err(EventsApiError::from)
}

/// Changes the given fields of an `Event` that has not started yet
#[derive(Debug)]
pub struct UpdateEventUseCase {
    pub event_id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_ts: Option<i64>,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub event: Event,
    /// Whether the start time changed
    pub rescheduled: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    EmptyTitle,
    AlreadyStarted(ID),
    StartInThePast(i64),
    StorageError,
}

impl From<UseCaseError> for EventsApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::EmptyTitle => Self::InvalidInput("An event needs a title.".into()),
            UseCaseError::AlreadyStarted(event_id) => Self::InvalidInput(format!(
                "The event with id: {}, has already started and can no longer be changed.",
                event_id
            )),
            UseCaseError::StartInThePast(start_ts) => Self::InvalidInput(format!(
                "The event start: {}, is in the past.",
                start_ts
            )),
            UseCaseError::StorageError => Self::Unavailable,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateEventUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateEvent";

    async fn execute(&mut self, ctx: &EventsContext) -> Result<Self::Response, Self::Error> {
        let mut event = match ctx.repos.events.find(&self.event_id).await {
            Some(event) => event,
            None => return Err(UseCaseError::NotFound(self.event_id.clone())),
        };

        let now = ctx.sys.get_timestamp_millis();
        if event.has_started(now) {
            return Err(UseCaseError::AlreadyStarted(event.id));
        }

        if let Some(title) = &self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(UseCaseError::EmptyTitle);
            }
            event.title = title.to_string();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(location) = &self.location {
            event.location = location.clone();
        }

        let mut rescheduled = false;
        if let Some(start_ts) = self.start_ts {
            if start_ts <= now {
                return Err(UseCaseError::StartInThePast(start_ts));
            }
            rescheduled = start_ts != event.start_ts;
            event.start_ts = start_ts;
        }
        event.updated = now;

        ctx.repos
            .events
            .save(&event)
            .await
            .map(|_| UseCaseRes { event, rescheduled })
            .map_err(|_| UseCaseError::StorageError)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(ClearReminderMarksOnReschedule)]
    }
}
