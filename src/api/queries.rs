//! Query API endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::{MessageResponse, Payload};
use crate::errors::AppError;
use crate::models::{CreateQueryRequest, Query};
use crate::validation::{present, required, Validate};
use crate::AppState;

/// GET /api/lic/queries - List all queries.
pub async fn list_queries(State(state): State<AppState>) -> Result<Json<Vec<Query>>, AppError> {
    Ok(Json(state.repo.list_queries().await?))
}

/// POST /api/lic/submit-query - Store a visitor question.
pub async fn submit_query(
    State(state): State<AppState>,
    Payload(request): Payload<CreateQueryRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    request.validate()?;

    let query = state
        .repo
        .create_query(
            required(&request.name),
            present(request.email.as_deref()),
            required(&request.query),
        )
        .await?;
    tracing::info!(id = %query.id, "Query stored");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Query submitted successfully")),
    ))
}
