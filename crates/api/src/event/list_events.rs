use crate::error::EventsApiError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use events_api_api_structs::list_events::*;
use events_api_domain::Event;
use events_api_infra::EventsContext;

pub async fn list_events_controller(
    ctx: web::Data<EventsContext>,
) -> Result<HttpResponse, EventsApiError> {
    execute(ListEventsUseCase, &ctx)
        .await
        .map(|events| HttpResponse::Ok().json(APIResponse::new(events)))
        .map_err(EventsApiError::from)
}

#[derive(Debug)]
pub struct ListEventsUseCase;

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for EventsApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::Unavailable,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ListEventsUseCase {
    type Response = Vec<Event>;
    type Error = UseCaseError;

    const NAME: &'static str = "ListEvents";

    async fn execute(&mut self, ctx: &EventsContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .events
            .find_all()
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use events_api_domain::ID;

    #[actix_web::main]
    #[test]
    async fn lists_upcoming_events_soonest_first() {
        let ctx = EventsContext::create_inmemory();
        let now = ctx.sys.get_timestamp_millis();
        let mut ids = Vec::new();
        for (title, offset) in &[("Later", 2000), ("Sooner", 1000), ("Cancelled", 1500)] {
            let event = Event::new(
                title.to_string(),
                "".into(),
                "Oslo".into(),
                now + offset,
                ID::default(),
                now,
            );
            ctx.repos.events.insert(&event).await.unwrap();
            ids.push(event.id);
        }
        ctx.repos.events.delete(&ids[2], now).await;

        let events = ListEventsUseCase.execute(&ctx).await.expect("To list events");
        let titles = events.iter().map(|e| e.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Sooner", "Later"]);
    }

    #[actix_web::main]
    #[test]
    async fn lists_nothing_without_events() {
        let ctx = EventsContext::create_inmemory();
        assert!(ListEventsUseCase.execute(&ctx).await.unwrap().is_empty());
    }
}
