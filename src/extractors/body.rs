//! JSON person body whose parse failures use the JSON error envelope.

use crate::error::AppError;
use crate::model::Person;
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};

#[derive(Clone, Debug)]
pub struct PersonBody(pub Person);

/// Oversized and non-JSON bodies keep their own status; everything else is a 400.
fn rejection_error(e: JsonRejection) -> AppError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(e.body_text()),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => AppError::UnsupportedMediaType(e.body_text()),
        _ => AppError::BadRequest(e.body_text()),
    }
}

#[async_trait]
impl<S> FromRequest<S> for PersonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(person) = Json::<Person>::from_request(req, state)
            .await
            .map_err(rejection_error)?;
        Ok(PersonBody(person))
    }
}
