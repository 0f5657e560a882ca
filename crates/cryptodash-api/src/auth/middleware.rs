//! Axum용 JWT 인증 추출기.
//!
//! 검증 키는 요청 시점에 환경 변수에서 읽지 않고 `FromRef`로 상태에서
//! 가져옵니다.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::jwt::{Claims, JwtError, JwtKeys};
use crate::error::ApiErrorResponse;

/// 인증된 사용자.
///
/// ```rust,ignore
/// async fn protected_handler(auth: JwtAuth) -> impl IntoResponse {
///     format!("user {}", auth.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth {
    pub user_id: i64,
    pub claims: Claims,
}

/// JWT 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtAuthError {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidAuthHeader,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
}

impl JwtAuthError {
    fn code(&self) -> &'static str {
        match self {
            JwtAuthError::MissingToken => "MISSING_TOKEN",
            JwtAuthError::InvalidAuthHeader => "INVALID_AUTH_HEADER",
            JwtAuthError::TokenExpired => "TOKEN_EXPIRED",
            JwtAuthError::InvalidToken => "INVALID_TOKEN",
        }
    }
}

impl IntoResponse for JwtAuthError {
    fn into_response(self) -> Response {
        crate::metrics::record_auth_rejection(self.code());
        let body = Json(ApiErrorResponse::new(self.code(), self.to_string()));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

impl<S> FromRequestParts<S> for JwtAuth
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(JwtAuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(JwtAuthError::InvalidAuthHeader)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.decode(token).map_err(|e| match e {
            JwtError::TokenExpired => JwtAuthError::TokenExpired,
            _ => JwtAuthError::InvalidToken,
        })?;

        let user_id = claims.user_id().ok_or(JwtAuthError::InvalidToken)?;

        Ok(JwtAuth { user_id, claims })
    }
}
