//! 코인 시세 조회. 캐시하지 않습니다.

use cryptodash_data::{CoinQuote, PriceSource};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use super::selector::resolve_coin_ids;
use crate::metrics;

/// 제공자 장애 시 코인별 고정 시세.
pub fn placeholder_price(coin_id: &str) -> f64 {
    match coin_id {
        "bitcoin" => 45000.0,
        "ethereum" => 3000.0,
        "solana" => 150.0,
        "cardano" => 0.5,
        _ => 0.8,
    }
}

/// 코인 ID 목록에 대한 고정 시세 맵.
pub fn placeholder_prices(coin_ids: &[String]) -> BTreeMap<String, CoinQuote> {
    coin_ids
        .iter()
        .map(|id| {
            (
                id.clone(),
                CoinQuote {
                    usd: placeholder_price(id),
                },
            )
        })
        .collect()
}

pub struct PriceService {
    source: Arc<dyn PriceSource>,
}

impl PriceService {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    /// 관심 자산(저장된 원본 문자열)의 USD 시세.
    pub async fn prices(&self, interested_assets: Option<&str>) -> BTreeMap<String, CoinQuote> {
        let coin_ids = resolve_coin_ids(interested_assets);

        let started = Instant::now();
        let result = self.source.simple_price(&coin_ids).await;
        metrics::record_provider_duration("prices", started.elapsed().as_secs_f64());

        match result {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!(error = %e, ids = ?coin_ids, "시세 조회 실패, 고정 시세 사용");
                metrics::record_fallback("prices");
                placeholder_prices(&coin_ids)
            }
        }
    }
}
