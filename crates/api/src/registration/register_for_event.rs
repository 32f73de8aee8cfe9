use super::subscribers::SendConfirmationOnRegistration;
use crate::error::EventsApiError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use events_api_api_structs::register_for_event::*;
use events_api_domain::{Event, Registration, User, ID};
use events_api_infra::EventsContext;

pub async fn register_for_event_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<EventsContext>,
) -> Result<HttpResponse, EventsApiError> {
    let usecase = RegisterForEventUseCase {
        event_id: path_params.event_id.clone(),
        user_id: body.0.user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(APIResponse::new(res.registration)))
        .map_err(EventsApiError::from)
}

#[derive(Debug)]
pub struct RegisterForEventUseCase {
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
    EventHasStarted(ID),
    AlreadyRegistered,
    StorageError,
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
            UseCaseError::EventHasStarted(event_id) => Self::InvalidInput(format!(
                "The event with id: {}, has already started.",
                event_id
            )),
            UseCaseError::AlreadyRegistered => {
                Self::Conflict("The user is already registered for this event.".into())
            }
            UseCaseError::StorageError => Self::Unavailable,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RegisterForEventUseCase {
    type Response = UseCaseRes;
    type Error = UseCaseError;

    const NAME: &'static str = "RegisterForEvent";

    async fn execute(&mut self, ctx: &EventsContext) -> Result<Self::Response, Self::Error> {
        let event = match ctx.repos.events.find(&self.event_id).await {
            Some(event) => event,
            None => return Err(UseCaseError::EventNotFound(self.event_id.clone())),
        };
        let user = match ctx.repos.users.find(&self.user_id).await {
            Some(user) => user,
            None => return Err(UseCaseError::UserNotFound(self.user_id.clone())),
        };

        let now = ctx.sys.get_timestamp_millis();
        if event.has_started(now) {
            return Err(UseCaseError::EventHasStarted(event.id));
        }

        if ctx
            .repos
            .registrations
            .find_active(&user.id, &event.id)
            .await
            .is_some()
        {
            return Err(UseCaseError::AlreadyRegistered);
        }

        let registration = Registration::new(user.id.clone(), event.id.clone(), now);
        // The repo enforces uniqueness too, so a concurrent duplicate fails here
        if ctx.repos.registrations.insert(&registration).await.is_err() {
            return match ctx.repos.registrations.find_active(&user.id, &event.id).await {
                Some(_) => Err(UseCaseError::AlreadyRegistered),
                None => Err(UseCaseError::StorageError),
            };
        }

        Ok(UseCaseRes {
            registration,
            event,
            user,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SendConfirmationOnRegistration)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use events_api_infra::{InMemoryNotifier, StaticTimeSys};
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000_000;
    const HOUR: i64 = 1000 * 60 * 60;

    struct TestContext {
        ctx: EventsContext,
        notifier: Arc<InMemoryNotifier>,
        sys: Arc<StaticTimeSys>,
        event: Event,
        user: User,
    }

    async fn setup() -> TestContext {
        let sys = Arc::new(StaticTimeSys::new(NOW));
        let mut ctx = EventsContext::create_inmemory_with_sys(sys.clone());
        let notifier = Arc::new(InMemoryNotifier::new());
        ctx.notifier = notifier.clone();

        let creator = User::new("Creator".into(), "creator@example.com".into(), NOW);
        ctx.repos.users.insert(&creator).await.unwrap();
        let user = User::new("Ada".into(), "ada@example.com".into(), NOW);
        ctx.repos.users.insert(&user).await.unwrap();
        let event = Event::new(
            "Rust meetup".into(),
            "Talks about async".into(),
            "Oslo".into(),
            NOW + 2 * HOUR,
            creator.id.clone(),
            NOW,
        );
        ctx.repos.events.insert(&event).await.unwrap();

        TestContext {
            ctx,
            notifier,
            sys,
            event,
            user,
        }
    }

    #[actix_web::main]
    #[test]
    async fn registers_user_and_sends_confirmation() {
        let TestContext {
            ctx,
            notifier,
            event,
            user,
            ..
        } = setup().await;

        let usecase = RegisterForEventUseCase {
            event_id: event.id.clone(),
            user_id: user.id.clone(),
        };
        let res = execute(usecase, &ctx).await.expect("To register");
        assert!(res.registration.is_for(&user.id, &event.id));

        let attendees = ctx.repos.events.find(&event.id).await.unwrap().attendees;
        assert_eq!(attendees.len(), 1);
        assert_eq!(attendees[0].user, user);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].workflow_id, ctx.config.workflows.registration);
        assert_eq!(sent[0].recipient.email, user.email);
        assert_eq!(sent[0].payload["eventTitle"], "Rust meetup");
        assert_eq!(sent[0].payload["eventLocation"], "Oslo");
    }

    #[actix_web::main]
    #[test]
    async fn rejects_second_registration() {
        let TestContext {
            ctx,
            notifier,
            event,
            user,
            ..
        } = setup().await;

        let mut usecase = RegisterForEventUseCase {
            event_id: event.id.clone(),
            user_id: user.id.clone(),
        };
        assert!(usecase.execute(&ctx).await.is_ok());
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::AlreadyRegistered
        );
        // Subscribers only run through `execute`
        assert!(notifier.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_registration_for_started_event() {
        let TestContext {
            ctx,
            sys,
            event,
            user,
            ..
        } = setup().await;
        sys.set(event.start_ts);

        let mut usecase = RegisterForEventUseCase {
            event_id: event.id.clone(),
            user_id: user.id,
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::EventHasStarted(event.id)
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_event_and_user() {
        let TestContext {
            ctx, event, user, ..
        } = setup().await;

        let unknown = ID::default();
        let mut usecase = RegisterForEventUseCase {
            event_id: unknown.clone(),
            user_id: user.id,
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::EventNotFound(unknown.clone())
        );

        let mut usecase = RegisterForEventUseCase {
            event_id: event.id,
            user_id: unknown.clone(),
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::UserNotFound(unknown)
        );
    }

    #[actix_web::main]
    #[test]
    async fn failing_confirmation_does_not_fail_registration() {
        let TestContext {
            ctx,
            notifier,
            event,
            user,
            ..
        } = setup().await;
        notifier.fail_for(&user.email);

        let usecase = RegisterForEventUseCase {
            event_id: event.id.clone(),
            user_id: user.id.clone(),
        };
        assert!(execute(usecase, &ctx).await.is_ok());
        assert!(ctx
            .repos
            .registrations
            .find_active(&user.id, &event.id)
            .await
            .is_some());
    }
}
