//! User Repository
//!
//! 계정 생성과 이메일 조회. 이메일은 저장 전에 소문자로 정규화됩니다.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

// ================================================================================================
// Types
// ================================================================================================

/// 사용자 레코드
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// 이메일 정규화 (앞뒤 공백 제거, 소문자).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ================================================================================================
// Repository
// ================================================================================================

pub struct UserRepository;

impl UserRepository {
    /// 사용자 생성.
    ///
    /// 이메일이 이미 있으면 UNIQUE 제약 위반 에러를 반환합니다.
    pub async fn create(
        pool: &SqlitePool,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<UserRecord, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, name, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(normalize_email(email))
        .bind(name.trim())
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    /// 이메일로 사용자 조회.
    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await
    }

    /// 이메일 사용 여부.
    pub async fn exists_by_email(pool: &SqlitePool, email: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_one(pool)
            .await?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptodash_data::Database;

    #[tokio::test]
    async fn test_create_and_find_normalizes_email() {
        let db = Database::connect_in_memory().await.unwrap();
        let pool = db.pool();

        let user = UserRepository::create(pool, "  Ada@Example.COM ", "Ada", "$argon2id$x")
            .await
            .unwrap();
        assert_eq!(user.email, "ada@example.com");

        let found = UserRepository::find_by_email(pool, "ADA@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert!(UserRepository::exists_by_email(pool, "ada@example.com")
            .await
            .unwrap());
        assert!(!UserRepository::exists_by_email(pool, "bob@example.com")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let db = Database::connect_in_memory().await.unwrap();
        let pool = db.pool();

        UserRepository::create(pool, "ada@example.com", "Ada", "h")
            .await
            .unwrap();
        let err = UserRepository::create(pool, "ADA@example.com", "Ada 2", "h")
            .await
            .unwrap_err();

        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
