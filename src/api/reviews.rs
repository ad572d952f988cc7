use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, ReviewCreatedDto};
use crate::domain::ReviewId;
use crate::models::review::{ReviewDraft, ReviewRow};

/// GET /reviews
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ReviewRow>>>, ApiError> {
    let reviews = state.review_service().list_reviews().await?;
    Ok(Json(ApiResponse::success(reviews)))
}

/// GET /reviews/{id}
pub async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewRow>>, ApiError> {
    let id = validate_id("review", id)?;
    let review = state.review_service().get_review(ReviewId::new(id)).await?;
    Ok(Json(ApiResponse::success(review)))
}

/// POST /reviews
///
/// The author is always the authenticated caller; the body cannot name a user.
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<ReviewDraft>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewCreatedDto>>), ApiError> {
    let id = state.review_service().create_review(user.id, draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReviewCreatedDto { id })),
    ))
}
