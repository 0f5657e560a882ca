//! REST API 라우트.
//!
//! # 엔드포인트 구성
//!
//! - `/health` - 헬스 체크
//! - `/api/auth` - 가입, 로그인
//! - `/api/onboarding` - 콘텐츠 선호
//! - `/api/vote` - 섹션 피드백
//! - `/api/dashboard` - 뉴스, 시세, AI 인사이트, 밈

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod onboarding;
pub mod votes;

pub use auth::{auth_router, AuthResponse, BackendStatus, LoginRequest, RegisterRequest};
pub use dashboard::dashboard_router;
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use onboarding::{onboarding_router, PreferencesRequest, SerializedList};
pub use votes::{votes_router, VoteRequest};

use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 단순 메시지 응답 (`{message}`).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/auth", auth_router())
        .nest("/api/onboarding", onboarding_router())
        .nest("/api/vote", votes_router())
        .nest("/api/dashboard", dashboard_router())
}
