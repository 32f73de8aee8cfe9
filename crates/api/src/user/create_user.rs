use super::subscribers::SendWelcomeOnUserCreated;
use crate::error::EventsApiError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use events_api_api_structs::create_user::*;
use events_api_domain::User;
use events_api_infra::EventsContext;
use validator::Validate;

pub async fn create_user_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<EventsContext>,
) -> Result<HttpResponse, EventsApiError> {
    let body = body.0;
    let usecase = CreateUserUseCase {
        name: body.name,
        email: body.email,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(EventsApiError::from)
}

#[derive(Debug, Validate)]
pub struct CreateUserUseCase {
    pub name: String,
    /// Stored trimmed and lowercased
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidEmail(String),
    EmailAlreadyInUse(String),
    StorageError,
}

impl From<UseCaseError> for EventsApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidEmail(email) => {
                Self::InvalidInput(format!("The email: {}, is not valid.", email))
            }
            UseCaseError::EmailAlreadyInUse(email) => Self::Conflict(format!(
                "A user with the email: {}, already exists. Emails need to be unique.",
                email
            )),
            UseCaseError::StorageError => Self::Unavailable,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = User;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &EventsContext) -> Result<Self::Response, Self::Error> {
        let given_email = self.email.clone();
        self.email = given_email.trim().to_lowercase();
        if self.validate().is_err() {
            return Err(UseCaseError::InvalidEmail(given_email));
        }
        let email = self.email.clone();

        if ctx.repos.users.find_by_email(&email).await.is_some() {
            return Err(UseCaseError::EmailAlreadyInUse(email));
        }

        let user = User::new(
            self.name.trim().to_string(),
            email,
            ctx.sys.get_timestamp_millis(),
        );
        ctx.repos
            .users
            .insert(&user)
            .await
            .map(|_| user)
            .map_err(|_| UseCaseError::StorageError)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SendWelcomeOnUserCreated)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use events_api_infra::InMemoryNotifier;
    use std::sync::Arc;

    #[actix_web::main]
    #[test]
    async fn creates_user_with_normalized_email() {
        let ctx = EventsContext::create_inmemory();
        let mut usecase = CreateUserUseCase {
            name: " Ada ".into(),
            email: "Ada@Example.com".into(),
        };

        let user = usecase.execute(&ctx).await.expect("To create user");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(ctx.repos.users.find(&user.id).await, Some(user));
    }

    #[actix_web::main]
    #[test]
    async fn welcomes_created_user() {
        let mut ctx = EventsContext::create_inmemory();
        let notifier = Arc::new(InMemoryNotifier::new());
        ctx.notifier = notifier.clone();

        let usecase = CreateUserUseCase {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };
        assert!(execute(usecase, &ctx).await.is_ok());

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].workflow_id, ctx.config.workflows.welcome);
        assert_eq!(sent[0].recipient.email, "ada@example.com");
        assert_eq!(sent[0].payload["name"], "Ada");
    }

    #[actix_web::main]
    #[test]
    async fn rejects_duplicate_email() {
        let ctx = EventsContext::create_inmemory();
        let mut usecase = CreateUserUseCase {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };
        assert!(usecase.execute(&ctx).await.is_ok());

        let res = usecase.execute(&ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::EmailAlreadyInUse("ada@example.com".into())
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_email() {
        let ctx = EventsContext::create_inmemory();
        let invalid = [
            "",
            "ada",
            "ada@",
            "@example.com",
            "ada lovelace@example.com",
            "ada@example.",
            "ada@.",
            "ada@exa mple.com",
        ];
        for email in &invalid {
            let mut usecase = CreateUserUseCase {
                name: "Ada".into(),
                email: email.to_string(),
            };
            assert_eq!(
                usecase.execute(&ctx).await.unwrap_err(),
                UseCaseError::InvalidEmail(email.to_string())
            );
        }
        assert!(ctx.repos.users.find_by_email("ada@example.").await.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn accepts_emails_with_plus_and_subdomains() {
        let ctx = EventsContext::create_inmemory();
        let mut usecase = CreateUserUseCase {
            name: "Ada".into(),
            email: " Ada+events@mail.Example.co.uk ".into(),
        };

        let user = usecase.execute(&ctx).await.expect("To create user");
        assert_eq!(user.email, "ada+events@mail.example.co.uk");
    }
}
