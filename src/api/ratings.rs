//! Rating API endpoints.

use axum::{extract::State, Json};

use super::Payload;
use crate::errors::AppError;
use crate::models::{Rating, UpsertRatingRequest};
use crate::validation::Validate;
use crate::AppState;

/// GET /api/lic/ratings - List all ratings.
pub async fn list_ratings(State(state): State<AppState>) -> Result<Json<Vec<Rating>>, AppError> {
    Ok(Json(state.repo.list_ratings().await?))
}

/// POST /api/lic/ratings - Insert or replace the caller's rating.
///
/// Keyed by user id, so repeating a submission updates rather than duplicates;
/// hence 200 rather than 201.
pub async fn upsert_rating(
    State(state): State<AppState>,
    Payload(request): Payload<UpsertRatingRequest>,
) -> Result<Json<Rating>, AppError> {
    request.validate()?;

    let (Some(user_id), Some(stars)) = (
        request.resolved_user_id(),
        request.rating.as_ref().and_then(|r| r.stars()),
    ) else {
        return Err(AppError::Internal(
            "Validated rating request lost its fields".to_string(),
        ));
    };

    let rating = state.repo.upsert_rating(&user_id, stars).await?;
    tracing::info!(user_id = %rating.user_id, rating = rating.rating, "Rating upserted");

    Ok(Json(rating))
}
