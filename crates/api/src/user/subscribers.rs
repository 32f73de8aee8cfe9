use super::create_user::CreateUserUseCase;
use crate::shared::usecase::Subscriber;
use events_api_domain::User;
use events_api_infra::{EventsContext, Recipient};
use serde_json::json;
use tracing::error;

pub struct SendWelcomeOnUserCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateUserUseCase> for SendWelcomeOnUserCreated {
    async fn notify(&self, user: &User, ctx: &EventsContext) {
        let workflow_id = &ctx.config.workflows.welcome;
        let payload = json!({ "name": user.name });
        if let Err(e) = ctx
            .notifier
            .trigger(workflow_id, &Recipient::from(user), payload)
            .await
        {
            error!(
                "Failed to send welcome notification to: {}. Error: {:?}",
                user.email, e
            );
        }
    }
}
