//! Vote Repository
//!
//! (사용자, 섹션)당 한 행. 다시 투표하면 값과 시각을 덮어씁니다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use utoipa::ToSchema;

/// 투표 레코드
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub section_type: String,
    pub is_positive: bool,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

pub struct VoteRepository;

impl VoteRepository {
    /// 사용자의 모든 투표 (섹션 이름순).
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<VoteRecord>, sqlx::Error> {
        sqlx::query_as::<_, VoteRecord>(
            r#"
            SELECT section_type, is_positive, created_at
            FROM votes
            WHERE user_id = ?
            ORDER BY section_type
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// 투표 저장. 같은 섹션에 이전 투표가 있으면 덮어씁니다.
    pub async fn upsert(
        pool: &SqlitePool,
        user_id: i64,
        section_type: &str,
        is_positive: bool,
    ) -> Result<VoteRecord, sqlx::Error> {
        sqlx::query_as::<_, VoteRecord>(
            r#"
            INSERT INTO votes (user_id, section_type, is_positive, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, section_type) DO UPDATE SET
                is_positive = excluded.is_positive,
                created_at = excluded.created_at
            RETURNING section_type, is_positive, created_at
            "#,
        )
        .bind(user_id)
        .bind(section_type)
        .bind(is_positive)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }
}
