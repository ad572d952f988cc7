use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AuthError, MovieError, ReviewError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    Conflict(String),

    InternalError(String),

    Unauthorized(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::UserNotFound | AuthError::Token(_) => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::UsernameTaken(_) => ApiError::Conflict(err.to_string()),
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        match err {
            MovieError::Validation(msg) => ApiError::ValidationError(msg),
            MovieError::UnresolvedReference { .. } => ApiError::ValidationError(err.to_string()),
            MovieError::NotFound(_) => ApiError::NotFound(err.to_string()),
            MovieError::Database(msg) => ApiError::DatabaseError(msg),
            MovieError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Invalid(msg) => ApiError::ValidationError(msg),
            ReviewError::MovieNotFound(_) | ReviewError::NotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            ReviewError::Duplicate(_) => ApiError::Conflict(err.to_string()),
            ReviewError::Database(msg) => ApiError::DatabaseError(msg),
            ReviewError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("Authentication required".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MovieId, ReferenceKind};
    use crate::services::TokenError;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn auth_errors_map_to_expected_statuses() {
        assert_eq!(status_of(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AuthError::Token(TokenError::Expired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AuthError::UsernameTaken("alice".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AuthError::Validation("short".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unresolved_reference_is_a_bad_request() {
        let err = MovieError::UnresolvedReference {
            kind: ReferenceKind::Genre,
            id: 99,
        };
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn review_errors_map_to_expected_statuses() {
        assert_eq!(
            status_of(ReviewError::Duplicate(MovieId::new(1))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ReviewError::MovieNotFound(MovieId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ReviewError::Invalid("empty".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_errors_hide_details() {
        let response = ApiError::from(MovieError::Database("disk I/O error".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
