//! Reddit 리스팅 클라이언트.

use async_trait::async_trait;
use cryptodash_core::ProvidersConfig;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{ensure_success, http_client};
use crate::error::Result;

/// 한 번에 가져오는 리스팅 크기.
pub const LISTING_LIMIT: u32 = 25;

/// 리스팅의 게시물 하나.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListingPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub post_hint: Option<String>,
    #[serde(default)]
    pub url_overridden_by_dest: Option<String>,
}

impl ListingPost {
    /// 이미지 게시물이면 이미지 URL을 반환합니다.
    pub fn image_url(&self) -> Option<&str> {
        if self.post_hint.as_deref() != Some("image") {
            return None;
        }
        self.url_overridden_by_dest
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: ListingPost,
}

/// 밈 리스팅 제공자 인터페이스.
#[async_trait]
pub trait MemeSource: Send + Sync {
    /// 서브레딧의 인기 게시물 목록을 가져옵니다.
    async fn hot_posts(&self, subreddit: &str) -> Result<Vec<ListingPost>>;
}

/// Reddit `hot.json` 클라이언트.
#[derive(Clone)]
pub struct RedditClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RedditClient {
    pub fn new(base_url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(user_agent, timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        Self::new(
            config.meme_base_url.clone(),
            &config.meme_user_agent,
            config.fetch_timeout(),
        )
    }
}

#[async_trait]
impl MemeSource for RedditClient {
    async fn hot_posts(&self, subreddit: &str) -> Result<Vec<ListingPost>> {
        let url = format!("{}/r/{}/hot.json", self.base_url, subreddit);
        debug!(url = %url, "밈 리스팅 요청");

        let response = self
            .client
            .get(&url)
            .query(&[("limit", LISTING_LIMIT)])
            .timeout(self.timeout)
            .send()
            .await?;

        let body = ensure_success("reddit", response)?.text().await?;
        let listing: Listing = serde_json::from_str(&body)?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .collect())
    }
}
