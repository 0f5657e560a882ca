//! 일일 뉴스 집계기.
//!
//! 하루에 한 번 뉴스 제공자를 호출하고 결과를 `(news, 날짜)` 키로 저장합니다.
//! 같은 날 이후 요청은 저장된 페이로드를 검증한 뒤 그대로 돌려줍니다.
//!
//! # 흐름
//!
//! ```text
//! lock(key) ─▶ store.get ─▶ inspect ─┬─ Fresh ─────────────────────▶ 반환
//!                                    └─ Stale/Corrupt ─▶ delete ─┐
//!            (miss) ─────────────────────────────────────────────┤
//!                                                                ▼
//!                            fetch ─┬─ Ok(body) ─▶ inspect ─┬─ Fresh ─▶ put ─▶ 반환
//!                                   │                       └─ 그 외 ─┐
//!                                   └─ Err ──────────────────────────┴─▶ fallback ─▶ put ─▶ 반환
//! ```
//!
//! 이 경로는 절대 에러를 반환하지 않습니다. 저장소 장애는 캐시 미스로,
//! 제공자 장애와 형식이 잘못된 응답 본문은 대체 페이로드로 흡수합니다.
//! 따라서 저장되는 페이로드는 항상 검증을 통과한 것입니다.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use cryptodash_core::{CacheKey, ContentType};
use cryptodash_data::{ContentCacheStore, NewsSource};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::freshness::{Freshness, FreshnessValidator};
use super::single_flight::KeyedLocks;
use crate::metrics;

/// 제공자 장애 시 사용할 고정 기사 (제목, 링크).
pub const FALLBACK_ARTICLES: [(&str, &str); 3] = [
    ("Bitcoin reaches new high", "https://www.coindesk.com/tag/bitcoin/"),
    ("Ethereum upgrade successful", "https://ethereum.org/upgrades/"),
    ("Crypto market shows bullish trends", "https://www.coindesk.com/markets/"),
];

/// 고정 3건짜리 대체 뉴스 페이로드. `published_at`은 `now`.
pub fn fallback_payload(now: DateTime<Utc>) -> String {
    let published_at = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let results: Vec<_> = FALLBACK_ARTICLES
        .iter()
        .map(|(title, url)| {
            json!({
                "title": title,
                "url": url,
                "published_at": published_at,
            })
        })
        .collect();

    json!({ "results": results }).to_string()
}

pub struct NewsAggregator {
    store: Arc<dyn ContentCacheStore>,
    source: Arc<dyn NewsSource>,
    validator: FreshnessValidator,
    locks: KeyedLocks<CacheKey>,
}

impl NewsAggregator {
    pub fn new(
        store: Arc<dyn ContentCacheStore>,
        source: Arc<dyn NewsSource>,
        validator: FreshnessValidator,
    ) -> Self {
        Self {
            store,
            source,
            validator,
            locks: KeyedLocks::new(),
        }
    }

    /// `today`의 뉴스 페이로드 (원본 JSON 텍스트).
    pub async fn todays_news(&self, today: NaiveDate) -> String {
        let key = CacheKey::news(today);
        let content_type = ContentType::News.as_str();

        // 같은 날짜의 재생성은 하나씩. 대기했던 요청은 아래 get에서 앞선 결과를 읽음
        let _guard = self.locks.lock(&key).await;

        match self.store.get(&key).await {
            Ok(Some(cached)) => match self.validator.inspect(&cached.payload) {
                Freshness::Fresh => {
                    debug!(key = %key, "뉴스 캐시 적중");
                    metrics::record_cache_hit(content_type);
                    return cached.payload;
                }
                verdict => {
                    info!(key = %key, reason = verdict.reason_label(), "캐시된 뉴스 무효화");
                    metrics::record_cache_invalidation(content_type, verdict.reason_label());
                    if let Err(e) = self.store.delete(&key).await {
                        warn!(key = %key, error = %e, "캐시 삭제 실패");
                    }
                }
            },
            Ok(None) => debug!(key = %key, "뉴스 캐시 없음"),
            Err(e) => warn!(key = %key, error = %e, "캐시 조회 실패, 미스로 처리"),
        }

        let started = Instant::now();
        let payload = match self.source.fetch_posts().await {
            Ok(body) => match self.validator.inspect(&body) {
                Freshness::Fresh => body,
                verdict => {
                    warn!(reason = verdict.reason_label(), "뉴스 응답 본문이 유효하지 않음, 대체 페이로드 사용");
                    metrics::record_fallback("news");
                    fallback_payload(Utc::now())
                }
            },
            Err(e) => {
                warn!(error = %e, "뉴스 제공자 호출 실패, 대체 페이로드 사용");
                metrics::record_fallback("news");
                fallback_payload(Utc::now())
            }
        };
        metrics::record_provider_duration("news", started.elapsed().as_secs_f64());

        if let Err(e) = self.store.put(&key, &payload).await {
            warn!(key = %key, error = %e, "뉴스 저장 실패");
        }

        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cryptodash_data::{
        CachedContent, CryptoPanicClient, Database, DataError, SqliteContentCache,
    };
    use mockito::Matcher;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const SENTINEL: &str = "https://www.coindesk.com/bitcoin";
    const LIVE_BODY: &str =
        r#"{"results":[{"title":"Live","url":"https://cryptopanic.com/news/1","published_at":"2026-03-01T08:00:00Z"}]}"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    async fn store() -> Arc<SqliteContentCache> {
        let db = Database::connect_in_memory().await.unwrap();
        Arc::new(SqliteContentCache::new(db.pool().clone()))
    }

    fn aggregator(store: Arc<dyn ContentCacheStore>, source: Arc<dyn NewsSource>) -> NewsAggregator {
        NewsAggregator::new(store, source, FreshnessValidator::new([SENTINEL]))
    }

    fn client(url: String) -> Arc<dyn NewsSource> {
        Arc::new(CryptoPanicClient::new(url, "demo", Duration::from_millis(300)).unwrap())
    }

    async fn server_returning(status: usize, body: &str, hits: usize) -> (mockito::ServerGuard, mockito::Mock) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/posts/")
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(body)
            .expect(hits)
            .create_async()
            .await;
        (server, mock)
    }

    fn assert_is_fallback(payload: &str) {
        let value: serde_json::Value = serde_json::from_str(payload).unwrap();
        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        for (item, (title, url)) in results.iter().zip(FALLBACK_ARTICLES) {
            assert_eq!(item["title"], title);
            assert_eq!(item["url"], url);
            assert!(DateTime::parse_from_rfc3339(item["published_at"].as_str().unwrap()).is_ok());
        }
    }

    #[test]
    fn test_fallback_payload_is_fresh() {
        let validator = FreshnessValidator::new([SENTINEL]);
        let payload = fallback_payload(Utc::now());
        assert_is_fallback(&payload);
        assert!(validator.inspect(&payload).is_fresh());
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_provider() {
        let store = store().await;
        let cached = r#"{"results":[{"title":"Cached","url":"https://a.io/1"}]}"#;
        store.put(&CacheKey::news(today()), cached).await.unwrap();

        let (server, mock) = server_returning(200, LIVE_BODY, 0).await;
        let news = aggregator(store, client(format!("{}/api/v1/posts/", server.url())));

        assert_eq!(news.todays_news(today()).await, cached);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_miss_fetches_and_persists() {
        let store = store().await;
        let (server, mock) = server_returning(200, LIVE_BODY, 1).await;
        let news = aggregator(store.clone(), client(format!("{}/api/v1/posts/", server.url())));

        assert_eq!(news.todays_news(today()).await, LIVE_BODY);
        // 두 번째 요청은 캐시에서
        assert_eq!(news.todays_news(today()).await, LIVE_BODY);
        mock.assert_async().await;

        let stored = store.get(&CacheKey::news(today())).await.unwrap().unwrap();
        assert_eq!(stored.payload, LIVE_BODY);
    }

    #[tokio::test]
    async fn test_stale_or_corrupt_cache_is_replaced() {
        for cached in [
            format!(r#"{{"results":[{{"url":"https://ok.io"}},{{"url":"{}"}}]}}"#, SENTINEL),
            r#"{"results":[{"url":"/relative"}]}"#.to_string(),
            "not json".to_string(),
        ] {
            let store = store().await;
            store.put(&CacheKey::news(today()), &cached).await.unwrap();

            let (server, mock) = server_returning(200, LIVE_BODY, 1).await;
            let news = aggregator(store.clone(), client(format!("{}/api/v1/posts/", server.url())));

            assert_eq!(news.todays_news(today()).await, LIVE_BODY, "{cached}");
            mock.assert_async().await;

            let stored = store.get(&CacheKey::news(today())).await.unwrap().unwrap();
            assert_eq!(stored.payload, LIVE_BODY);
        }
    }

    #[tokio::test]
    async fn test_provider_error_status_yields_persisted_fallback() {
        let store = store().await;
        let (server, mock) = server_returning(500, "oops", 1).await;
        let news = aggregator(store.clone(), client(format!("{}/api/v1/posts/", server.url())));

        let payload = news.todays_news(today()).await;
        assert_is_fallback(&payload);
        mock.assert_async().await;

        let stored = store.get(&CacheKey::news(today())).await.unwrap().unwrap();
        assert_eq!(stored.payload, payload);
    }

    #[tokio::test]
    async fn test_malformed_success_body_yields_persisted_fallback() {
        let store = store().await;
        let (server, mock) = server_returning(200, "<html>rate limited</html>", 1).await;
        let news = aggregator(store.clone(), client(format!("{}/api/v1/posts/", server.url())));

        let payload = news.todays_news(today()).await;
        assert_is_fallback(&payload);
        mock.assert_async().await;

        let stored = store.get(&CacheKey::news(today())).await.unwrap().unwrap();
        assert_eq!(stored.payload, payload);
    }

    #[tokio::test]
    async fn test_previous_day_cache_is_not_served() {
        let store = store().await;
        let yesterday = r#"{"results":[{"title":"Yesterday","url":"https://a.io/1"}]}"#;
        store.put(&CacheKey::news(today()), yesterday).await.unwrap();

        let (server, mock) = server_returning(200, LIVE_BODY, 1).await;
        let news = aggregator(store.clone(), client(format!("{}/api/v1/posts/", server.url())));

        let tomorrow = today().succ_opt().unwrap();
        assert_eq!(news.todays_news(tomorrow).await, LIVE_BODY);
        mock.assert_async().await;

        // 지난 날짜 행은 purge_before 전까지 그대로
        let old = store.get(&CacheKey::news(today())).await.unwrap().unwrap();
        assert_eq!(old.payload, yesterday);
        let new = store.get(&CacheKey::news(tomorrow)).await.unwrap().unwrap();
        assert_eq!(new.payload, LIVE_BODY);
    }

    #[tokio::test]
    async fn test_provider_timeout_yields_fallback() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let store = store().await;
        let news = aggregator(store.clone(), client(format!("http://{}/api/v1/posts/", addr)));

        assert_is_fallback(&news.todays_news(today()).await);
        assert!(store.get(&CacheKey::news(today())).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unreachable_provider_yields_fallback() {
        // 바인딩 후 즉시 닫아 아무도 듣지 않는 포트
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let store = store().await;
        let news = aggregator(store, client(format!("http://{}/api/v1/posts/", addr)));

        assert_is_fallback(&news.todays_news(today()).await);
    }

    // ==================== 동시성 ====================

    struct ScriptedSource {
        bodies: std::sync::Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl NewsSource for ScriptedSource {
        async fn fetch_posts(&self) -> cryptodash_data::Result<String> {
            let mut bodies = self.bodies.lock().unwrap();
            Ok(bodies.remove(0).to_string())
        }
    }

    #[tokio::test]
    async fn test_success_body_without_links_is_not_cached() {
        let source = Arc::new(ScriptedSource {
            bodies: std::sync::Mutex::new(vec![r#"{"results":[]}"#, LIVE_BODY]),
        });
        let store = store().await;
        let news = aggregator(store.clone(), source.clone());

        // 링크 없는 2xx 본문 대신 대체 페이로드가 저장되고, 다음 요청은 캐시 적중
        let first = news.todays_news(today()).await;
        assert_is_fallback(&first);
        assert_eq!(news.todays_news(today()).await, first);
        assert_eq!(source.bodies.lock().unwrap().len(), 1);

        let stored = store.get(&CacheKey::news(today())).await.unwrap().unwrap();
        assert_eq!(stored.payload, first);
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NewsSource for CountingSource {
        async fn fetch_posts(&self) -> cryptodash_data::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(LIVE_BODY.to_string())
        }
    }

    #[tokio::test]
    async fn test_concurrent_misses_call_provider_once() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let news = Arc::new(aggregator(store().await, source.clone()));

        let (a, b) = tokio::join!(news.todays_news(today()), news.todays_news(today()));

        assert_eq!(a, LIVE_BODY);
        assert_eq!(b, LIVE_BODY);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    // ==================== 저장소 장애 ====================

    struct BrokenStore;

    #[async_trait]
    impl ContentCacheStore for BrokenStore {
        async fn get(&self, _key: &CacheKey) -> cryptodash_data::Result<Option<CachedContent>> {
            Err(DataError::ConnectionError("down".into()))
        }
        async fn put(&self, _key: &CacheKey, _payload: &str) -> cryptodash_data::Result<CachedContent> {
            Err(DataError::ConnectionError("down".into()))
        }
        async fn delete(&self, _key: &CacheKey) -> cryptodash_data::Result<u64> {
            Err(DataError::ConnectionError("down".into()))
        }
        async fn purge_before(&self, _date: NaiveDate) -> cryptodash_data::Result<u64> {
            Err(DataError::ConnectionError("down".into()))
        }
    }

    #[tokio::test]
    async fn test_failing_store_still_returns_payload() {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let news = aggregator(Arc::new(BrokenStore), source.clone());

        assert_eq!(news.todays_news(today()).await, LIVE_BODY);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
