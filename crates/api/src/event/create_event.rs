use crate::error::EventsApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use events_api_api_structs::create_event::*;
use events_api_domain::{Event, ID};
use events_api_infra::EventsContext;

pub async fn create_event_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<EventsContext>,
) -> Result<HttpResponse, EventsApiError> {
    let body = body.0;
    let usecase = CreateEventUseCase {
        title: body.title,
        description: body.description,
        location: body.location,
        start_ts: body.start_ts,
        creator_id: body.creator_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(EventsApiError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_ts: i64,
    pub creator_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyTitle,
    StartInThePast(i64),
    CreatorNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for EventsApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyTitle => Self::InvalidInput("An event needs a title.".into()),
            UseCaseError::StartInThePast(start_ts) => Self::InvalidInput(format!(
                "The event start: {}, is in the past.",
                start_ts
            )),
            UseCaseError::CreatorNotFound(user_id) => Self::NotFound(format!(
                "The user with id: {}, was not found.",
                user_id
            )),
            UseCaseError::StorageError => Self::Unavailable,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = Event;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &EventsContext) -> Result<Self::Response, Self::Error> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }

        let now = ctx.sys.get_timestamp_millis();
        if self.start_ts <= now {
            return Err(UseCaseError::StartInThePast(self.start_ts));
        }

        if ctx.repos.users.find(&self.creator_id).await.is_none() {
            return Err(UseCaseError::CreatorNotFound(self.creator_id.clone()));
        }

        let event = Event::new(
            title.to_string(),
            self.description.clone(),
            self.location.clone(),
            self.start_ts,
            self.creator_id.clone(),
            now,
        );

        ctx.repos
            .events
            .insert(&event)
            .await
            .map(|_| event)
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use events_api_domain::User;
    use events_api_infra::StaticTimeSys;
    use std::sync::Arc;

    const NOW: i64 = 1_700_000_000_000;

    async fn setup() -> (EventsContext, User) {
        let ctx = EventsContext::create_inmemory_with_sys(Arc::new(StaticTimeSys::new(NOW)));
        let user = User::new("Ada".into(), "ada@example.com".into(), NOW);
        ctx.repos.users.insert(&user).await.unwrap();
        (ctx, user)
    }

    fn usecase(creator_id: ID, start_ts: i64) -> CreateEventUseCase {
        CreateEventUseCase {
            title: "Rust meetup".into(),
            description: "Talks about async".into(),
            location: "Oslo".into(),
            start_ts,
            creator_id,
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_event() {
        let (ctx, user) = setup().await;

        let event = usecase(user.id.clone(), NOW + 1000)
            .execute(&ctx)
            .await
            .expect("To create event");

        assert_eq!(event.creator_id, user.id);
        assert_eq!(event.created, NOW);
        assert!(event.attendees.is_empty());
        assert_eq!(ctx.repos.events.find(&event.id).await, Some(event));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_event_in_the_past() {
        let (ctx, user) = setup().await;

        let res = usecase(user.id, NOW).execute(&ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::StartInThePast(NOW));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_unknown_creator() {
        let (ctx, _) = setup().await;
        let creator_id = ID::default();

        let res = usecase(creator_id.clone(), NOW + 1000).execute(&ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::CreatorNotFound(creator_id));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_blank_title() {
        let (ctx, user) = setup().await;
        let mut usecase = usecase(user.id, NOW + 1000);
        usecase.title = "   ".into();

        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::EmptyTitle
        );
    }
}
