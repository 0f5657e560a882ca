//! Preferences Repository
//!
//! 온보딩 선호. 사용자당 한 행이며 저장은 upsert입니다. 목록 값
//! (`interested_assets`, `content_types`)은 JSON 배열 문자열로 보관합니다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use utoipa::ToSchema;

/// 선호 레코드
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRecord {
    pub user_id: i64,
    /// JSON 배열 문자열 (예: `["Bitcoin","Solana"]`)
    pub interested_assets: String,
    pub investor_type: String,
    /// JSON 배열 문자열 (예: `["Market News","Fun"]`)
    pub content_types: String,
    pub created_at: DateTime<Utc>,
}

/// 저장할 선호 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPreferences {
    pub interested_assets: String,
    pub investor_type: String,
    pub content_types: String,
}

pub struct PreferencesRepository;

impl PreferencesRepository {
    /// 사용자 선호 조회.
    pub async fn get(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<PreferencesRecord>, sqlx::Error> {
        sqlx::query_as::<_, PreferencesRecord>(
            r#"
            SELECT user_id, interested_assets, investor_type, content_types, created_at
            FROM user_preferences
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// 사용자 선호 저장 (있으면 덮어씀).
    pub async fn upsert(
        pool: &SqlitePool,
        user_id: i64,
        input: &NewPreferences,
    ) -> Result<PreferencesRecord, sqlx::Error> {
        sqlx::query_as::<_, PreferencesRecord>(
            r#"
            INSERT INTO user_preferences
                (user_id, interested_assets, investor_type, content_types, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                interested_assets = excluded.interested_assets,
                investor_type = excluded.investor_type,
                content_types = excluded.content_types
            RETURNING user_id, interested_assets, investor_type, content_types, created_at
            "#,
        )
        .bind(user_id)
        .bind(&input.interested_assets)
        .bind(&input.investor_type)
        .bind(&input.content_types)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    /// 저장된 `content_types` 원본 문자열만 조회.
    pub async fn content_types(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT content_types FROM user_preferences WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// 저장된 `interested_assets` 원본 문자열만 조회.
    pub async fn interested_assets(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT interested_assets FROM user_preferences WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
