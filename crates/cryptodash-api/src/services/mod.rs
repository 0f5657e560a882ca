//! 대시보드 콘텐츠 서비스.
//!
//! 각 서비스는 제공자 장애를 스스로 흡수하고 항상 응답 가능한 값을 돌려줍니다.

pub mod fallback;
pub mod freshness;
pub mod insight;
pub mod meme;
pub mod news;
pub mod prices;
pub mod selector;
pub mod single_flight;

pub use fallback::{FallbackPicker, FixedPicker, RandomPicker};
pub use freshness::{Freshness, FreshnessValidator, StaleReason};
pub use insight::{InsightResponse, InsightService};
pub use meme::{MemeResponse, MemeService};
pub use news::NewsAggregator;
pub use prices::PriceService;
pub use single_flight::KeyedLocks;
