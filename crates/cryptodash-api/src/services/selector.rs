//! 사용자 선호 → 제공자 요청 파라미터.
//!
//! 선호 조회 실패는 모두 "선호 없음"으로 취급합니다. 콘텐츠 엔드포인트는
//! 선호를 읽지 못해도 기본값으로 응답해야 하기 때문입니다.

use cryptodash_core::{parse_string_list, ContentTags};
use sqlx::SqlitePool;
use tracing::warn;

use crate::repository::PreferencesRepository;

/// 선호 자산이 없을 때의 기본 코인.
pub const DEFAULT_COIN_IDS: [&str; 3] = ["bitcoin", "ethereum", "solana"];

/// 자산 이름 → CoinGecko ID (대소문자 무시).
pub fn coin_id_for(asset: &str) -> Option<&'static str> {
    match asset.trim().to_lowercase().as_str() {
        "bitcoin" => Some("bitcoin"),
        "ethereum" => Some("ethereum"),
        "solana" => Some("solana"),
        "cardano" => Some("cardano"),
        "polygon" => Some("matic-network"),
        _ => None,
    }
}

fn default_coin_ids() -> Vec<String> {
    DEFAULT_COIN_IDS.iter().map(|s| s.to_string()).collect()
}

/// 저장된 `interestedAssets` 값에서 조회할 코인 ID 목록을 결정합니다.
///
/// 해석 실패, 빈 목록, 인식 가능한 자산 없음 → 기본 코인.
/// 순서는 유지하고 중복은 제거합니다.
pub fn resolve_coin_ids(interested_assets: Option<&str>) -> Vec<String> {
    let Some(assets) = interested_assets.and_then(parse_string_list) else {
        return default_coin_ids();
    };

    // 같은 코인을 중복 요청하지 않음 (응답 맵은 중복 여부와 무관하게 동일)
    let mut ids: Vec<String> = Vec::new();
    for id in assets.iter().filter_map(|asset| coin_id_for(asset)) {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }

    if ids.is_empty() {
        default_coin_ids()
    } else {
        ids
    }
}

/// 사용자의 콘텐츠 태그를 조회합니다.
pub async fn content_tags_for(pool: &SqlitePool, user_id: i64) -> ContentTags {
    match PreferencesRepository::content_types(pool, user_id).await {
        Ok(raw) => ContentTags::parse(raw.as_deref()),
        Err(e) => {
            warn!(user_id, error = %e, "선호 조회 실패, 기본 태그 사용");
            ContentTags::default()
        }
    }
}

/// 사용자의 관심 자산 원본 문자열을 조회합니다.
pub async fn interested_assets_for(pool: &SqlitePool, user_id: i64) -> Option<String> {
    match PreferencesRepository::interested_assets(pool, user_id).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(user_id, error = %e, "선호 조회 실패, 기본 코인 사용");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{NewPreferences, UserRepository};
    use cryptodash_data::Database;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_symbol_table_is_case_insensitive() {
        assert_eq!(coin_id_for("POLYGON"), Some("matic-network"));
        assert_eq!(coin_id_for(" cardano "), Some("cardano"));
        assert_eq!(coin_id_for("Other"), None);
    }

    #[test]
    fn test_recognized_assets_replace_defaults() {
        assert_eq!(
            resolve_coin_ids(Some(r#"["Polygon","Bitcoin","Other","bitcoin"]"#)),
            ids(&["matic-network", "bitcoin"])
        );
    }

    #[test]
    fn test_unrecognized_or_missing_assets_use_defaults() {
        let defaults = ids(&DEFAULT_COIN_IDS);
        assert_eq!(resolve_coin_ids(Some(r#"["Other","Dogecoin"]"#)), defaults);
        assert_eq!(resolve_coin_ids(Some("[]")), defaults);
        assert_eq!(resolve_coin_ids(Some("Bitcoin")), defaults);
        assert_eq!(resolve_coin_ids(None), defaults);
    }

    #[tokio::test]
    async fn test_content_tags_for_user() {
        let db = Database::connect_in_memory().await.unwrap();
        let pool = db.pool();
        let user = UserRepository::create(pool, "a@b.c", "A", "h").await.unwrap();

        assert!(content_tags_for(pool, user.id).await.is_empty());

        PreferencesRepository::upsert(
            pool,
            user.id,
            &NewPreferences {
                interested_assets: r#"["Solana"]"#.into(),
                investor_type: "Day Trader".into(),
                content_types: r#"["Charts","Fun"]"#.into(),
            },
        )
        .await
        .unwrap();

        let tags = content_tags_for(pool, user.id).await;
        assert!(tags.prefers_charts());
        assert!(tags.prefers_fun());
        assert_eq!(
            resolve_coin_ids(interested_assets_for(pool, user.id).await.as_deref()),
            ids(&["solana"])
        );
    }

    #[tokio::test]
    async fn test_database_failure_yields_empty_tags() {
        let db = Database::connect_in_memory().await.unwrap();
        db.pool().close().await;

        assert!(content_tags_for(db.pool(), 1).await.is_empty());
        assert!(interested_assets_for(db.pool(), 1).await.is_none());
    }
}
