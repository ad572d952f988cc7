use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use super::observability::RequestSpan;
use super::{ApiError, ApiResponse, AppState, CredentialsRequest};
use crate::domain::UserId;
use crate::services::{AuthError, LoginResult, RegisteredUser, UserInfo};

/// Identity of the caller, inserted into request extensions by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects the request with 401 unless `Authorization` carries a valid token for
/// an existing user. Accepts `Bearer <token>` as well as a bare token.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_token(request.headers()) else {
        debug!("Rejected request: missing credential");
        return Err(ApiError::unauthorized());
    };

    let user = match state.auth_service().authenticate(&token).await {
        Ok(user) => user,
        Err(AuthError::Token(reason)) => {
            warn!(reason = %reason, "Rejected request: invalid token");
            return Err(ApiError::unauthorized());
        }
        Err(AuthError::UserNotFound) => {
            warn!("Rejected request: token subject no longer exists");
            return Err(ApiError::unauthorized());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(RequestSpan(span)) = request.extensions().get::<RequestSpan>() {
        span.record("user_id", user.id.value());
    }
    request.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
    });

    Ok(next.run(request).await)
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /users
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisteredUser>>), ApiError> {
    let user = state
        .auth_service()
        .register(&payload.username, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// POST /token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// GET /users/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let info = state.auth_service().resolve(user.id).await?;
    Ok(Json(ApiResponse::success(info)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_and_bare_tokens_are_accepted() {
        assert_eq!(extract_token(&headers("Bearer abc.def")), Some("abc.def".to_string()));
        assert_eq!(extract_token(&headers("abc.def")), Some("abc.def".to_string()));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(extract_token(&headers("bearer abc.def")), Some("abc.def".to_string()));
        assert_eq!(extract_token(&headers("BEARER abc.def")), Some("abc.def".to_string()));
        assert_eq!(extract_token(&headers("bearer")), None);
    }

    #[test]
    fn blank_header_counts_as_missing() {
        assert_eq!(extract_token(&headers("Bearer ")), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }
}
