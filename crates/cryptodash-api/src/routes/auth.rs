//! 계정 endpoint.
//!
//! # 엔드포인트
//!
//! - `GET /api/auth/health` - 백엔드 동작 확인
//! - `POST /api/auth/register` - 가입 후 토큰 발급
//! - `POST /api/auth/login` - 로그인 후 토큰 발급

use axum::{extract::State, routing::get, routing::post, Json, Router};
use cryptodash_data::DataError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::repository::{normalize_email, UserRecord, UserRepository};
use crate::state::AppState;

const DUPLICATE_EMAIL: &str = "User with this email already exists";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ==================== 요청/응답 타입 ====================

/// 가입 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// 인증 성공 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub email: String,
    pub name: String,
}

/// 백엔드 상태 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct BackendStatus {
    pub status: &'static str,
    pub message: &'static str,
}

fn issue_for(state: &AppState, user: &UserRecord) -> ApiResult<AuthResponse> {
    let token = state
        .jwt
        .issue(user.id, &user.email, &user.name)
        .map_err(|e| ApiError::Internal(format!("token issue failed: {}", e)))?;

    Ok(AuthResponse {
        token,
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
    })
}

// ==================== Handler ====================

/// GET /api/auth/health
#[utoipa::path(
    get,
    path = "/api/auth/health",
    responses((status = 200, description = "백엔드 동작 중", body = BackendStatus)),
    tag = "auth"
)]
pub async fn backend_health() -> Json<BackendStatus> {
    Json(BackendStatus {
        status: "ok",
        message: "Backend is running",
    })
}

/// 가입.
///
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "가입 성공", body = AuthResponse),
        (status = 400, description = "중복 이메일 또는 입력 오류", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    request.validate()?;

    let pool = state.db.pool();
    let email = normalize_email(&request.email);

    if UserRepository::exists_by_email(pool, &email).await? {
        return Err(ApiError::BadRequest(DUPLICATE_EMAIL.to_string()));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    // exists 확인과 insert 사이에 같은 이메일이 들어온 경우
    let user = match UserRepository::create(pool, &email, &request.name, &password_hash).await {
        Ok(user) => user,
        Err(e) => {
            return Err(match DataError::from(e) {
                DataError::DuplicateError(_) => ApiError::BadRequest(DUPLICATE_EMAIL.to_string()),
                other => other.into(),
            })
        }
    };

    info!(user_id = user.id, "사용자 가입");
    Ok(Json(issue_for(&state, &user)?))
}

/// 로그인.
///
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = AuthResponse),
        (status = 401, description = "이메일 또는 비밀번호 불일치", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    request.validate()?;

    let Some(user) = UserRepository::find_by_email(state.db.pool(), &request.email).await? else {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if let Err(e) = verify_password(&request.password, &user.password_hash) {
        warn!(user_id = user.id, error = %e, "로그인 실패");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    Ok(Json(issue_for(&state, &user)?))
}

/// 계정 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(backend_health))
        .route("/register", post(register))
        .route("/login", post(login))
}
