use crate::shared::usecase::UseCase;
use events_api_domain::{Event, ReminderWindow};
use events_api_infra::EventsContext;
use std::time::Duration;

/// Finds the `Event`s starting within `tolerance` of `now_ts + offset`,
/// with their attendees loaded
#[derive(Debug)]
pub struct FindEventsInWindowUseCase {
    pub now_ts: i64,
    pub offset: Duration,
    pub tolerance: Duration,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError(anyhow::Error),
}

#[async_trait::async_trait(?Send)]
impl UseCase for FindEventsInWindowUseCase {
    type Response = Vec<Event>;
    type Error = UseCaseError;

    const NAME: &'static str = "FindEventsInWindow";

    async fn execute(&mut self, ctx: &EventsContext) -> Result<Self::Response, Self::Error> {
        let band = ReminderWindow::band_for(self.now_ts, self.offset, self.tolerance);
        ctx.repos
            .events
            .find_between(&band)
            .await
            .map_err(UseCaseError::StorageError)
    }
}
