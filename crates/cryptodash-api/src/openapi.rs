//! OpenAPI 문서화 설정.
//!
//! utoipa로 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새 엔드포인트를 추가할 때:
//!
//! 1. 요청/응답 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::repository::{PreferencesRecord, VoteRecord};
use crate::routes::{
    AuthResponse, BackendStatus, ComponentHealth, ComponentStatus, HealthResponse, LoginRequest,
    MessageResponse, PreferencesRequest, RegisterRequest, SerializedList, VoteRequest,
};
use crate::services::{InsightResponse, MemeResponse};

// ==================== OpenAPI 문서 정의 ====================

/// CryptoDash API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CryptoDash API",
        description = r#"
# CryptoDash 개인화 대시보드 REST API

- **계정**: 가입, 로그인 (JWT 발급)
- **온보딩**: 관심 자산, 투자 성향, 콘텐츠 선호 저장
- **대시보드**: 당일 뉴스, 코인 시세, AI 인사이트, 밈
- **피드백**: 섹션별 좋아요/싫어요

## 인증

`/api/onboarding`, `/api/vote`, `/api/dashboard/*`는 JWT Bearer 토큰이 필요합니다.
`Authorization: Bearer <token>` 헤더를 포함하세요.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "로컬 개발 서버"),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "계정 - 가입 및 로그인"),
        (name = "onboarding", description = "온보딩 - 콘텐츠 선호"),
        (name = "votes", description = "피드백 - 섹션별 투표"),
        (name = "dashboard", description = "대시보드 - 뉴스, 시세, 인사이트, 밈")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,
            MessageResponse,

            // ===== Auth =====
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            BackendStatus,

            // ===== Onboarding =====
            PreferencesRequest,
            SerializedList,
            PreferencesRecord,

            // ===== Votes =====
            VoteRequest,
            VoteRecord,

            // ===== Dashboard =====
            InsightResponse,
            MemeResponse,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        crate::routes::auth::backend_health,
        crate::routes::auth::register,
        crate::routes::auth::login,

        crate::routes::onboarding::save_preferences,
        crate::routes::onboarding::get_preferences,

        crate::routes::votes::save_vote,
        crate::routes::votes::list_votes,

        crate::routes::dashboard::market_news,
        crate::routes::dashboard::coin_prices,
        crate::routes::dashboard::ai_insight,
        crate::routes::dashboard::meme,
    )
)]
pub struct ApiDoc;

/// `bearer_auth` 보안 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
