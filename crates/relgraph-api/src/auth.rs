//! Bearer-token gate for mutating endpoints.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that succeeds only when `Authorization: Bearer <token>` carries
/// the configured token.
///
/// Place it before any body extractor so a rejected request never reads its
/// body or reaches the store.
#[derive(Debug, Clone, Copy)]
pub struct RequireBearer;

#[async_trait]
impl FromRequestParts<AppState> for RequireBearer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token);

        match token {
            Some(t) if state.token_matches(t) => Ok(RequireBearer),
            Some(_) => {
                tracing::warn!(path = %parts.uri.path(), "Rejected request with invalid token");
                Err(ApiError::Unauthorized)
            }
            None => {
                tracing::warn!(path = %parts.uri.path(), "Rejected request without bearer token");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// Token part of a `Bearer` authorization header. The scheme is
/// case-insensitive; the token is taken verbatim.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
