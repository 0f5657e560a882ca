//! 데이터 저장 및 외부 시장 데이터 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - SQLite 연결 풀과 마이그레이션
//! - 일일 콘텐츠 캐시 저장소
//! - 외부 제공자 클라이언트 (뉴스, 시세, LLM, 밈 리스팅)

pub mod error;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};

// 저장소 타입 재내보내기
pub use storage::content_cache::{CachedContent, ContentCacheStore, SqliteContentCache};
pub use storage::database::Database;

// 제공자 재내보내기
pub use provider::{
    ChatCompletion, CoinGeckoClient, CoinQuote, CryptoPanicClient, ListingPost, MemeSource,
    NewsSource, OpenRouterClient, PriceSource, RedditClient,
};
