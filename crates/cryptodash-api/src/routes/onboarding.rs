//! 온보딩 선호 endpoint.
//!
//! - `POST /api/onboarding` - 선호 저장 (덮어쓰기)
//! - `GET /api/onboarding` - 저장된 선호 조회

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use super::MessageResponse;
use crate::auth::JwtAuth;
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::repository::{NewPreferences, PreferencesRecord, PreferencesRepository};
use crate::state::AppState;

/// 목록 필드 입력.
///
/// 프론트엔드는 목록을 JSON 문자열로 직렬화해 보내지만 배열도 받습니다.
/// 저장 형태는 항상 문자열입니다.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SerializedList {
    Text(String),
    Items(Vec<String>),
}

impl SerializedList {
    pub fn into_stored(self) -> String {
        match self {
            SerializedList::Text(text) => text,
            SerializedList::Items(items) => {
                serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }
}

/// 선호 저장 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    pub interested_assets: SerializedList,
    pub investor_type: String,
    pub content_types: SerializedList,
}

impl From<PreferencesRequest> for NewPreferences {
    fn from(request: PreferencesRequest) -> Self {
        Self {
            interested_assets: request.interested_assets.into_stored(),
            investor_type: request.investor_type,
            content_types: request.content_types.into_stored(),
        }
    }
}

/// POST /api/onboarding
#[utoipa::path(
    post,
    path = "/api/onboarding",
    request_body = PreferencesRequest,
    responses(
        (status = 200, description = "저장 완료", body = MessageResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "onboarding"
)]
pub async fn save_preferences(
    auth: JwtAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<PreferencesRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let input = NewPreferences::from(request);
    PreferencesRepository::upsert(state.db.pool(), auth.user_id, &input).await?;

    info!(user_id = auth.user_id, "선호 저장");
    Ok(Json(MessageResponse::new("Preferences saved successfully")))
}

/// GET /api/onboarding
#[utoipa::path(
    get,
    path = "/api/onboarding",
    responses(
        (status = 200, description = "저장된 선호", body = PreferencesRecord),
        (status = 404, description = "선호 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "onboarding"
)]
pub async fn get_preferences(
    auth: JwtAuth,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PreferencesRecord>> {
    PreferencesRepository::get(state.db.pool(), auth.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No preferences found".to_string()))
}

pub fn onboarding_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_preferences).post(save_preferences))
}
