//! Feedback API endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::{MessageResponse, Payload};
use crate::errors::AppError;
use crate::models::{CreateFeedbackRequest, Feedback};
use crate::validation::{present, required, Validate};
use crate::AppState;

/// GET /api/lic/feedbacks - List all feedback.
pub async fn list_feedbacks(
    State(state): State<AppState>,
) -> Result<Json<Vec<Feedback>>, AppError> {
    Ok(Json(state.repo.list_feedbacks().await?))
}

/// POST /api/lic/submit-feedback - Store a feedback message.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Payload(request): Payload<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    request.validate()?;

    let feedback = state
        .repo
        .create_feedback(
            required(&request.name),
            present(request.email.as_deref()),
            required(&request.feedback),
        )
        .await?;
    tracing::info!(id = %feedback.id, "Feedback stored");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Feedback submitted successfully")),
    ))
}
