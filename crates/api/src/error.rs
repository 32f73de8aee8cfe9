use actix_web::{http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Failures of the events api as seen by its clients.
///
/// The message of a variant is the `message` field of the JSON error body.
/// Storage and provider details are logged by the use case and never leave
/// the server.
#[derive(Error, Debug)]
pub enum EventsApiError {
    #[error("The request could not be completed, please try again later.")]
    Unavailable,
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
}

impl actix_web::error::ResponseError for EventsApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.to_string(),
        }))
    }
}
