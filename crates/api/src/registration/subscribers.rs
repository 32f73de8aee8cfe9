use super::{cancel_registration, register_for_event};
use crate::shared::usecase::Subscriber;
use events_api_domain::{Event, User};
use events_api_infra::{EventsContext, Recipient};
use serde_json::json;
use tracing::error;

async fn notify_attendee(
    ctx: &EventsContext,
    workflow_id: &str,
    user: &User,
    event: &Event,
    payload: serde_json::Value,
) {
    if let Err(e) = ctx
        .notifier
        .trigger(workflow_id, &Recipient::from(user), payload)
        .await
    {
        error!(
            "Failed to send {} to: {} for event: {}. Error: {:?}",
            workflow_id, user.email, event.id, e
        );
    }
}

pub struct SendConfirmationOnRegistration;

#[async_trait::async_trait(?Send)]
impl Subscriber<register_for_event::RegisterForEventUseCase> for SendConfirmationOnRegistration {
    async fn notify(&self, res: &register_for_event::UseCaseRes, ctx: &EventsContext) {
        let payload = json!({
            "name": res.user.name,
            "eventTitle": res.event.title,
            "eventTime": res.event.formatted_start(),
            "eventLocation": res.event.location,
        });
        notify_attendee(
            ctx,
            &ctx.config.workflows.registration,
            &res.user,
            &res.event,
            payload,
        )
        .await;
    }
}

pub struct SendNoticeOnCancellation;

#[async_trait::async_trait(?Send)]
impl Subscriber<cancel_registration::CancelRegistrationUseCase> for SendNoticeOnCancellation {
    async fn notify(&self, res: &cancel_registration::UseCaseRes, ctx: &EventsContext) {
        let payload = json!({
            "name": res.user.name,
            "eventTitle": res.event.title,
        });
        notify_attendee(
            ctx,
            &ctx.config.workflows.cancellation,
            &res.user,
            &res.event,
            payload,
        )
        .await;
    }
}
