use super::update_event::{UpdateEventUseCase, UseCaseRes};
use crate::shared::usecase::Subscriber;
use events_api_infra::EventsContext;
use tracing::warn;

/// A rescheduled `Event` is due for its reminders again at the new start time,
/// so the marks of reminders already sent for the old start time are removed.
pub struct ClearReminderMarksOnReschedule;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateEventUseCase> for ClearReminderMarksOnReschedule {
    async fn notify(&self, res: &UseCaseRes, ctx: &EventsContext) {
        if !res.rescheduled {
            return;
        }

        let windows = [&ctx.config.reminders_24h.window, &ctx.config.reminders_1h.window];
        for window in windows.iter() {
            let key = window.mark_key(&res.event.id);
            if let Err(e) = ctx.cache.delete(&key).await {
                warn!(
                    "Unable to clear reminder mark: {} of rescheduled event. Error: {:?}",
                    key, e
                );
            }
        }
    }
}
