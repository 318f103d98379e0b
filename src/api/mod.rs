//! HTTP API module.
//!
//! JSON endpoints under `/api/lic` plus the reviews page endpoints under `/reviews`.

mod feedback;
mod queries;
mod ratings;
mod reviews;
mod site;

pub use feedback::*;
pub use queries::*;
pub use ratings::*;
pub use reviews::*;
pub use site::*;

use axum::{
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppError;

/// Confirmation body returned by the submission endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Request body extractor accepting either JSON or a URL-encoded form.
///
/// The site's forms post URL-encoded bodies while its scripts send JSON; both
/// land in the same request schema. Undecodable bodies become a 400 in the
/// usual error envelope.
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            Ok(Payload(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
            Ok(Payload(value))
        }
    }
}
