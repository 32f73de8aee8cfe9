use super::subscribers::SendNoticeOnCancellation;
use crate::error::EventsApiError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use events_api_api_structs::cancel_registration::*;
use events_api_domain::{Event, Registration, User, ID};
use events_api_infra::EventsContext;

pub async fn cancel_registration_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<EventsContext>,
) -> Result<HttpResponse, EventsApiError> {
    let path_params = path_params.into_inner();
    let usecase = CancelRegistrationUseCase {
        event_id: path_params.event_id,
        user_id: path_params.user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.registration)))
        .map_err(EventsApiError::from)
}

#[derive(Debug)]
pub struct CancelRegistrationUseCase {
    pub event_id: ID,
    pub user_id: ID,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub registration: Registration,
    pub event: Event,
    pub user: User,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
    UserNotFound(ID),
    RegistrationNotFound,
}

impl From<UseCaseError> for EventsApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::UserNotFound(user_id) => Self::NotFound(format!(
                "The user with id: {}, was not found.",
                user_id
            )),
            UseCaseError::RegistrationNotFound => {
                Self::NotFound("The user is not registered for this event.".into())
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelRegistrationUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "CancelRegistration";

    async fn execute(&mut self, ctx: &EventsContext) -> Result<Self::Response, Self::Error> {
        let event = match ctx.repos.events.find(&self.event_id).await {
            Some(event) => event,
            None => return Err(UseCaseError::EventNotFound(self.event_id.clone())),
        };
        let user = match ctx.repos.users.find(&self.user_id).await {
            Some(user) => user,
            None => return Err(UseCaseError::UserNotFound(self.user_id.clone())),
        };

        let deleted = ctx.sys.get_timestamp_millis();
        match ctx
            .repos
            .registrations
            .cancel(&user.id, &event.id, deleted)
            .await
        {
            Some(registration) => Ok(UseCaseRes {
                registration,
                event,
                user,
            }),
            None => Err(UseCaseError::RegistrationNotFound),
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SendNoticeOnCancellation)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use events_api_infra::InMemoryNotifier;
    use std::sync::Arc;

    #[actix_web::main]
    #[test]
    async fn cancels_registration_and_sends_notice() {
        let mut ctx = EventsContext::create_inmemory();
        let notifier = Arc::new(InMemoryNotifier::new());
        ctx.notifier = notifier.clone();
        let now = ctx.sys.get_timestamp_millis();

        let user = User::new("Ada".into(), "ada@example.com".into(), now);
        ctx.repos.users.insert(&user).await.unwrap();
        let event = Event::new(
            "Rust meetup".into(),
            "".into(),
            "Oslo".into(),
            now + 1000 * 60 * 60,
            user.id.clone(),
            now,
        );
        ctx.repos.events.insert(&event).await.unwrap();
        let registration = Registration::new(user.id.clone(), event.id.clone(), now);
        ctx.repos.registrations.insert(&registration).await.unwrap();

        let usecase = CancelRegistrationUseCase {
            event_id: event.id.clone(),
            user_id: user.id.clone(),
        };
        let res = execute(usecase, &ctx).await.expect("To cancel");
        assert_eq!(res.registration.id, registration.id);
        assert!(!res.registration.is_active());
        assert!(ctx.repos.events.find(&event.id).await.unwrap().attendees.is_empty());

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].workflow_id, ctx.config.workflows.cancellation);
        assert_eq!(sent[0].payload["eventTitle"], "Rust meetup");

        let mut usecase = CancelRegistrationUseCase {
            event_id: event.id,
            user_id: user.id,
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::RegistrationNotFound
        );
    }
}
