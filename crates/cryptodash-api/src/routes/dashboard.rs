//! 대시보드 콘텐츠 endpoint.
//!
//! 네 엔드포인트 모두 제공자 장애 시 대체 값으로 200을 반환합니다.
//!
//! - `GET /api/dashboard/news` - 당일 뉴스 (원본 JSON 그대로)
//! - `GET /api/dashboard/prices` - 관심 코인 USD 시세
//! - `GET /api/dashboard/ai-insight` - 톤별 AI 인사이트
//! - `GET /api/dashboard/meme` - 밈 한 건

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use cryptodash_data::CoinQuote;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::auth::JwtAuth;
use crate::error::ApiErrorResponse;
use crate::services::selector::{content_tags_for, interested_assets_for};
use crate::services::{InsightResponse, MemeResponse};
use crate::state::AppState;

/// GET /api/dashboard/news
#[utoipa::path(
    get,
    path = "/api/dashboard/news",
    responses(
        (status = 200, description = "뉴스 제공자 응답 원본 (`{results: [...]}`)", content_type = "application/json"),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn market_news(_auth: JwtAuth, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let payload = state.news.todays_news(Utc::now().date_naive()).await;
    ([(CONTENT_TYPE, "application/json")], payload)
}

/// GET /api/dashboard/prices
#[utoipa::path(
    get,
    path = "/api/dashboard/prices",
    responses(
        (status = 200, description = "코인 ID별 시세 (`{bitcoin: {usd: 61000.0}}`)", content_type = "application/json"),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn coin_prices(
    auth: JwtAuth,
    State(state): State<Arc<AppState>>,
) -> Json<BTreeMap<String, CoinQuote>> {
    let assets = interested_assets_for(state.db.pool(), auth.user_id).await;
    Json(state.prices.prices(assets.as_deref()).await)
}

/// GET /api/dashboard/ai-insight
#[utoipa::path(
    get,
    path = "/api/dashboard/ai-insight",
    responses(
        (status = 200, description = "AI 인사이트", body = InsightResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn ai_insight(auth: JwtAuth, State(state): State<Arc<AppState>>) -> Json<InsightResponse> {
    let tags = content_tags_for(state.db.pool(), auth.user_id).await;
    Json(state.insight.insight(&tags).await)
}

/// GET /api/dashboard/meme
#[utoipa::path(
    get,
    path = "/api/dashboard/meme",
    responses(
        (status = 200, description = "밈", body = MemeResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn meme(auth: JwtAuth, State(state): State<Arc<AppState>>) -> Json<MemeResponse> {
    let tags = content_tags_for(state.db.pool(), auth.user_id).await;
    Json(state.memes.meme(&tags).await)
}

pub fn dashboard_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/news", get(market_news))
        .route("/prices", get(coin_prices))
        .route("/ai-insight", get(ai_insight))
        .route("/meme", get(meme))
}
