//! CryptoPanic 뉴스 클라이언트.
//!
//! 응답 본문은 해석하지 않고 원본 텍스트 그대로 반환합니다. 구조 검증은
//! 캐시 계층에서 수행합니다.

use async_trait::async_trait;
use cryptodash_core::ProvidersConfig;
use std::time::Duration;
use tracing::debug;

use super::{ensure_success, http_client, DEFAULT_USER_AGENT};
use crate::error::Result;

/// 뉴스 제공자 인터페이스.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// 최신 뉴스 목록의 원본 JSON 텍스트를 가져옵니다.
    async fn fetch_posts(&self) -> Result<String>;
}

/// CryptoPanic posts API 클라이언트.
#[derive(Clone)]
pub struct CryptoPanicClient {
    client: reqwest::Client,
    url: String,
    auth_token: String,
    timeout: Duration,
}

impl CryptoPanicClient {
    pub fn new(
        url: impl Into<String>,
        auth_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(DEFAULT_USER_AGENT, timeout)?,
            url: url.into(),
            auth_token: auth_token.into(),
            timeout,
        })
    }

    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Self::new(
            config.news_url.clone(),
            config.news_auth_token.clone(),
            config.fetch_timeout(),
        )
    }
}

#[async_trait]
impl NewsSource for CryptoPanicClient {
    async fn fetch_posts(&self) -> Result<String> {
        debug!(url = %self.url, "뉴스 요청");

        let response = self
            .client
            .get(&self.url)
            .query(&[("auth_token", self.auth_token.as_str()), ("public", "true")])
            .timeout(self.timeout)
            .send()
            .await?;

        let body = ensure_success("cryptopanic", response)?.text().await?;
        Ok(body)
    }
}
