use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState};
use crate::domain::MovieId;
use crate::models::movie::{MovieDetail, MovieDraft, MovieSummary};

/// GET /movies
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<MovieSummary>>>, ApiError> {
    let movies = state.movie_service().list_movies().await?;
    Ok(Json(ApiResponse::success(movies)))
}

/// GET /movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MovieDetail>>, ApiError> {
    let id = validate_id("movie", id)?;
    let movie = state.movie_service().get_movie(MovieId::new(id)).await?;
    Ok(Json(ApiResponse::success(movie)))
}

/// POST /movies
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<MovieDraft>,
) -> Result<(StatusCode, Json<ApiResponse<MovieDetail>>), ApiError> {
    let movie = state.movie_service().create_movie(user.id, draft).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(movie))))
}
