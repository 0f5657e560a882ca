//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 `Arc`로 래핑되어 라우터에 주입됩니다. 설정은 시작 시 한 번
//! 읽어 각 구성 요소 생성에 사용하고, 요청 처리 중에는 다시 읽지 않습니다.

use axum::extract::FromRef;
use cryptodash_core::AppConfig;
use cryptodash_data::{
    ChatCompletion, CoinGeckoClient, CryptoPanicClient, DataError, Database, OpenRouterClient,
    RedditClient, SqliteContentCache,
};
use std::sync::Arc;
use tracing::info;

use crate::auth::JwtKeys;
use crate::services::{
    FallbackPicker, FreshnessValidator, InsightService, MemeService, NewsAggregator, PriceService,
    RandomPicker,
};

/// 애플리케이션 공유 상태.
pub struct AppState {
    /// SQLite 연결 풀
    pub db: Database,

    /// JWT 서명/검증 키
    pub jwt: JwtKeys,

    /// 일일 뉴스 집계기 (캐시 + 단일 실행 잠금)
    pub news: NewsAggregator,

    pub prices: PriceService,
    pub insight: InsightService,
    pub memes: MemeService,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 설정으로부터 상태를 구성합니다. 대체 값 선택은 엔트로피 시드 난수.
    pub fn new(config: &AppConfig, db: Database) -> Result<Self, DataError> {
        Self::with_picker(config, db, Arc::new(RandomPicker::from_entropy()))
    }

    /// 대체 값 선택기를 지정해 상태를 구성합니다.
    pub fn with_picker(
        config: &AppConfig,
        db: Database,
        picker: Arc<dyn FallbackPicker>,
    ) -> Result<Self, DataError> {
        let providers = &config.providers;

        let news = NewsAggregator::new(
            Arc::new(SqliteContentCache::new(db.pool().clone())),
            Arc::new(CryptoPanicClient::from_config(providers)?),
            FreshnessValidator::new(config.content.blocked_urls.iter().cloned()),
        );

        let llm: Option<Arc<dyn ChatCompletion>> = match OpenRouterClient::from_config(providers)? {
            Some(client) => Some(Arc::new(client)),
            None => {
                info!("LLM API 키 미설정, AI 인사이트는 고정 문구 사용");
                None
            }
        };

        Ok(Self {
            jwt: JwtKeys::from_config(&config.jwt),
            news,
            prices: PriceService::new(Arc::new(CoinGeckoClient::from_config(providers)?)),
            insight: InsightService::new(llm, picker.clone()),
            memes: MemeService::new(Arc::new(RedditClient::from_config(providers)?), picker),
            db,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        self.db.health_check().await.unwrap_or(false)
    }
}

impl FromRef<Arc<AppState>> for JwtKeys {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.jwt.clone()
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 인메모리 DB를 사용하고, 외부 제공자는 닫힌 포트를 가리키므로 모든
/// 콘텐츠 엔드포인트가 대체 경로로 응답합니다.
#[cfg(any(test, feature = "test-utils"))]
pub async fn create_test_state() -> AppState {
    let mut config = AppConfig::default();
    let unreachable = "http://127.0.0.1:9";
    config.providers.news_url = format!("{}/api/v1/posts/", unreachable);
    config.providers.prices_url = format!("{}/api/v3/simple/price", unreachable);
    config.providers.llm_url = format!("{}/api/v1/chat/completions", unreachable);
    config.providers.llm_api_key = None;
    config.providers.meme_base_url = unreachable.to_string();
    config.providers.fetch_timeout_secs = 1;
    config.providers.default_timeout_secs = 1;

    let db = Database::connect_in_memory()
        .await
        .expect("in-memory database");
    AppState::with_picker(&config, db, Arc::new(RandomPicker::seeded(0)))
        .expect("test state")
}
