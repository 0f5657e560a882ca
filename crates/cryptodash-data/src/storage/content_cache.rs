//! 일일 콘텐츠 캐시 저장소.
//!
//! (콘텐츠 유형, UTC 날짜) 키마다 최대 한 행을 유지합니다. 테이블에
//! `UNIQUE(content_type, date)` 제약이 있고 `put`은 upsert이므로 동시에
//! 여러 요청이 같은 키를 기록해도 중복 행이 생기지 않습니다.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use cryptodash_core::{CacheKey, ContentType};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::Result;

/// 캐시된 콘텐츠 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct CachedContent {
    pub id: i64,
    pub content_type: String,
    pub date: NaiveDate,
    /// 원본 JSON 텍스트 (재직렬화하지 않음)
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl CachedContent {
    /// 레코드의 캐시 키. 알 수 없는 유형이면 `None`.
    pub fn key(&self) -> Option<CacheKey> {
        self.content_type
            .parse::<ContentType>()
            .ok()
            .map(|content_type| CacheKey::new(content_type, self.date))
    }
}

/// 콘텐츠 캐시 저장소 인터페이스.
#[async_trait]
pub trait ContentCacheStore: Send + Sync {
    /// 키에 해당하는 캐시를 조회합니다.
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedContent>>;

    /// 키에 페이로드를 기록합니다. 기존 행이 있으면 덮어씁니다.
    async fn put(&self, key: &CacheKey, payload: &str) -> Result<CachedContent>;

    /// 키에 해당하는 행을 삭제하고 삭제된 행 수를 반환합니다.
    async fn delete(&self, key: &CacheKey) -> Result<u64>;

    /// 주어진 날짜 이전의 모든 행을 삭제합니다.
    async fn purge_before(&self, date: NaiveDate) -> Result<u64>;
}

/// SQLite 기반 콘텐츠 캐시.
#[derive(Clone)]
pub struct SqliteContentCache {
    pool: SqlitePool,
}

impl SqliteContentCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentCacheStore for SqliteContentCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedContent>> {
        let row = sqlx::query_as::<_, CachedContent>(
            r#"
            SELECT id, content_type, date, payload, created_at
            FROM daily_content
            WHERE content_type = ? AND date = ?
            "#,
        )
        .bind(key.content_type.as_str())
        .bind(key.date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn put(&self, key: &CacheKey, payload: &str) -> Result<CachedContent> {
        let row = sqlx::query_as::<_, CachedContent>(
            r#"
            INSERT INTO daily_content (content_type, date, payload, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (content_type, date) DO UPDATE SET
                payload = excluded.payload,
                created_at = excluded.created_at
            RETURNING id, content_type, date, payload, created_at
            "#,
        )
        .bind(key.content_type.as_str())
        .bind(key.date)
        .bind(payload)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        debug!(key = %key, bytes = payload.len(), "콘텐츠 캐시 저장");
        Ok(row)
    }

    async fn delete(&self, key: &CacheKey) -> Result<u64> {
        let result = sqlx::query("DELETE FROM daily_content WHERE content_type = ? AND date = ?")
            .bind(key.content_type.as_str())
            .bind(key.date)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn purge_before(&self, date: NaiveDate) -> Result<u64> {
        let result = sqlx::query("DELETE FROM daily_content WHERE date < ?")
            .bind(date)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
