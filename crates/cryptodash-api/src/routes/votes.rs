//! 섹션 피드백 endpoint.
//!
//! - `POST /api/vote` - 섹션별 좋아요/싫어요 (마지막 투표 유지)
//! - `GET /api/vote` - 내 투표 목록

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

use super::MessageResponse;
use crate::auth::JwtAuth;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::repository::{VoteRecord, VoteRepository};
use crate::state::AppState;

/// 투표 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    /// 섹션 이름 (예: "MarketNews", "CoinPrices", "AiInsight", "Meme")
    #[validate(length(min = 1, max = 64, message = "sectionType is required"))]
    pub section_type: String,
    pub is_positive: bool,
}

/// POST /api/vote
#[utoipa::path(
    post,
    path = "/api/vote",
    request_body = VoteRequest,
    responses(
        (status = 200, description = "저장 완료", body = MessageResponse),
        (status = 400, description = "입력 오류", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "votes"
)]
pub async fn save_vote(
    auth: JwtAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<VoteRequest>,
) -> ApiResult<Json<MessageResponse>> {
    request.validate()?;

    let section = request.section_type.trim();
    VoteRepository::upsert(state.db.pool(), auth.user_id, section, request.is_positive).await?;

    debug!(user_id = auth.user_id, section, is_positive = request.is_positive, "투표 저장");
    Ok(Json(MessageResponse::new("Vote saved successfully")))
}

/// GET /api/vote
#[utoipa::path(
    get,
    path = "/api/vote",
    responses((status = 200, description = "내 투표 목록", body = [VoteRecord])),
    security(("bearer_auth" = [])),
    tag = "votes"
)]
pub async fn list_votes(
    auth: JwtAuth,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<VoteRecord>>> {
    let votes = VoteRepository::list_for_user(state.db.pool(), auth.user_id).await?;
    Ok(Json(votes))
}

pub fn votes_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_votes).post(save_vote))
}
