//! Endpoints backing the public reviews page.
//!
//! The two submit endpoints each write to more than one collection. The
//! writes are independent statements: a failure in the second leaves the
//! first in place and the caller gets a 500.

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;

use super::{reviews::store_review, MessageResponse, Payload};
use crate::aggregation;
use crate::errors::AppError;
use crate::models::{ContactFormRequest, Review, ReviewSummary, ReviewWithRatingRequest};
use crate::validation::{present, required, Validate};
use crate::AppState;

/// Body returned by `POST /reviews/submit-review`.
#[derive(Debug, Serialize)]
pub struct ReviewSubmitted {
    pub message: String,
    pub review: Review,
}

/// POST /reviews/submit-feedback - Contact form carrying feedback, a question, or both.
pub async fn submit_contact_form(
    State(state): State<AppState>,
    Payload(request): Payload<ContactFormRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    request.validate()?;

    let name = required(&request.name);
    let email = present(request.email.as_deref());

    if let Some(message) = present(request.message.as_deref()) {
        let feedback = state.repo.create_feedback(name, email, message).await?;
        tracing::info!(id = %feedback.id, "Feedback stored from contact form");
    }
    if let Some(query) = present(request.query.as_deref()) {
        let query = state.repo.create_query(name, email, query).await?;
        tracing::info!(id = %query.id, "Query stored from contact form");
    }

    Ok(Json(MessageResponse::new(
        "Thank you! Your message has been received.",
    )))
}

/// POST /reviews/submit-review - Store a review, then the reviewer's rating.
pub async fn submit_review(
    State(state): State<AppState>,
    Payload(request): Payload<ReviewWithRatingRequest>,
) -> Result<Json<ReviewSubmitted>, AppError> {
    request.validate()?;

    let Some(stars) = request.rating.as_ref().and_then(|r| r.stars()) else {
        return Err(AppError::Internal(
            "Validated review request lost its rating".to_string(),
        ));
    };

    let review = store_review(&state, &request.review_request()).await?;

    // Same key the aggregation uses to find this review's rating.
    let user_id = aggregation::correlation_key(&review);
    if let Err(e) = state.repo.upsert_rating(&user_id, stars).await {
        tracing::error!(review_id = %review.id, "Review stored but rating write failed");
        return Err(e);
    }

    Ok(Json(ReviewSubmitted {
        message: "Review submitted successfully".to_string(),
        review,
    }))
}

/// GET /reviews/summary - Reviews with resolved ratings plus the aggregate figures.
pub async fn review_summary(State(state): State<AppState>) -> Json<ReviewSummary> {
    Json(aggregation::review_summary(&state.repo).await)
}

/// GET /reviews/structured-data - schema.org JSON-LD for the agency.
pub async fn structured_data(State(state): State<AppState>) -> impl IntoResponse {
    let summary = aggregation::review_summary(&state.repo).await;
    let doc = aggregation::agency_json_ld(
        &state.config.agency_name,
        state.config.site_url.as_deref(),
        &summary,
    );
    ([(header::CONTENT_TYPE, "application/ld+json")], Json(doc))
}
