//! Review API endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::Payload;
use crate::errors::AppError;
use crate::models::{user_id_for, CreateReviewRequest, Review};
use crate::validation::{required, Validate};
use crate::AppState;

/// GET /api/lic/reviews - List all reviews.
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.repo.list_reviews().await?))
}

/// POST /api/lic/reviews - Store a review and return it.
pub async fn create_review(
    State(state): State<AppState>,
    Payload(request): Payload<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    request.validate()?;

    let review = store_review(&state, &request).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Persist a validated review together with its derived correlation key.
pub(super) async fn store_review(
    state: &AppState,
    request: &CreateReviewRequest,
) -> Result<Review, AppError> {
    let user_id = user_id_for(request.email.as_deref(), request.username.as_deref());

    let review = state
        .repo
        .create_review(
            required(&request.username),
            required(&request.comment),
            &request.language_or_default(),
            user_id.as_deref(),
        )
        .await?;
    tracing::info!(id = %review.id, language = %review.language, "Review stored");

    Ok(review)
}
