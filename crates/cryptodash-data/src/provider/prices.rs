//! CoinGecko 시세 클라이언트.

use async_trait::async_trait;
use cryptodash_core::ProvidersConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use super::{ensure_success, http_client, DEFAULT_USER_AGENT};
use crate::error::Result;

/// 코인 하나의 시세.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinQuote {
    /// USD 가격
    pub usd: f64,
}

/// 시세 제공자 인터페이스.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// 코인 ID 목록의 USD 시세를 한 번의 요청으로 조회합니다.
    async fn simple_price(&self, ids: &[String]) -> Result<BTreeMap<String, CoinQuote>>;
}

/// CoinGecko `simple/price` API 클라이언트.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    url: String,
}

impl CoinGeckoClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(DEFAULT_USER_AGENT, timeout)?,
            url: url.into(),
        })
    }

    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Self::new(config.prices_url.clone(), config.default_timeout())
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn simple_price(&self, ids: &[String]) -> Result<BTreeMap<String, CoinQuote>> {
        let ids = ids.join(",");
        debug!(ids = %ids, "시세 요청");

        let response = self
            .client
            .get(&self.url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", "usd")])
            .send()
            .await?;

        let body = ensure_success("coingecko", response)?.text().await?;
        let quotes: BTreeMap<String, CoinQuote> = serde_json::from_str(&body)?;
        Ok(quotes)
    }
}
