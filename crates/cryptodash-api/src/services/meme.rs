//! 밈 선택.

use cryptodash_core::ContentTags;
use cryptodash_data::MemeSource;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;
use utoipa::ToSchema;

use super::fallback::{pick, FallbackPicker};
use crate::metrics;

/// 후보로 쓰는 최대 이미지 게시물 수.
pub const MAX_CANDIDATES: usize = 10;

pub const FUN_TITLES: [&str; 3] = ["HODL!", "To the moon!", "Diamond hands!"];
pub const SERIOUS_TITLES: [&str; 3] = ["Stay informed", "Do your own research", "Invest wisely"];

/// 밈 응답
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MemeResponse {
    pub title: String,
    /// 이미지 URL. 대체 밈이면 빈 문자열
    pub url: String,
}

pub fn subreddit_for(tags: &ContentTags) -> &'static str {
    if tags.prefers_fun() {
        "cryptomemes"
    } else {
        "cryptocurrency"
    }
}

pub struct MemeService {
    source: Arc<dyn MemeSource>,
    picker: Arc<dyn FallbackPicker>,
}

impl MemeService {
    pub fn new(source: Arc<dyn MemeSource>, picker: Arc<dyn FallbackPicker>) -> Self {
        Self { source, picker }
    }

    pub async fn meme(&self, tags: &ContentTags) -> MemeResponse {
        let subreddit = subreddit_for(tags);

        let started = Instant::now();
        let result = self.source.hot_posts(subreddit).await;
        metrics::record_provider_duration("meme", started.elapsed().as_secs_f64());

        match result {
            Ok(posts) => {
                let candidates: Vec<MemeResponse> = posts
                    .iter()
                    .filter_map(|post| {
                        post.image_url().map(|url| MemeResponse {
                            title: post.title.clone(),
                            url: url.to_string(),
                        })
                    })
                    .take(MAX_CANDIDATES)
                    .collect();

                if let Some(meme) = pick(self.picker.as_ref(), &candidates) {
                    return meme.clone();
                }
                warn!(subreddit, "이미지 게시물 없음, 대체 밈 사용");
            }
            Err(e) => warn!(subreddit, error = %e, "밈 조회 실패, 대체 밈 사용"),
        }

        metrics::record_fallback("meme");
        self.fallback(tags)
    }

    fn fallback(&self, tags: &ContentTags) -> MemeResponse {
        let pool: &[&str] = if tags.prefers_fun() {
            &FUN_TITLES
        } else {
            &SERIOUS_TITLES
        };
        let title = pick(self.picker.as_ref(), pool).copied().unwrap_or(pool[0]);
        MemeResponse {
            title: title.to_string(),
            url: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fallback::{FixedPicker, RandomPicker};
    use cryptodash_data::RedditClient;
    use serde_json::json;
    use std::time::Duration;

    fn fun() -> ContentTags {
        ContentTags::parse(Some(r#"["Fun"]"#))
    }

    fn service(server: &mockito::ServerGuard, picker: impl FallbackPicker + 'static) -> MemeService {
        let client = RedditClient::new(server.url(), "CryptoDashboard/1.0", Duration::from_secs(5)).unwrap();
        MemeService::new(Arc::new(client), Arc::new(picker))
    }

    fn listing(posts: Vec<serde_json::Value>) -> String {
        let children: Vec<_> = posts.into_iter().map(|data| json!({ "data": data })).collect();
        json!({ "data": { "children": children } }).to_string()
    }

    #[tokio::test]
    async fn test_picks_among_first_ten_images() {
        let mut posts = vec![json!({"title": "text only", "post_hint": "self"})];
        for i in 0..12 {
            posts.push(json!({
                "title": format!("meme {i}"),
                "post_hint": "image",
                "url_overridden_by_dest": format!("https://i.redd.it/{i}.png"),
            }));
        }

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/r/cryptomemes/hot.json")
            .match_query(mockito::Matcher::UrlEncoded("limit".into(), "25".into()))
            .with_status(200)
            .with_body(listing(posts))
            .expect(1)
            .create_async()
            .await;

        // 범위를 넘는 인덱스는 마지막 후보로 고정됨
        let meme = service(&server, FixedPicker(usize::MAX)).meme(&fun()).await;

        mock.assert_async().await;
        assert_eq!(meme.title, "meme 9");
        assert_eq!(meme.url, "https://i.redd.it/9.png");
    }

    #[tokio::test]
    async fn test_no_image_posts_uses_tone_pool() {
        let posts = vec![
            json!({"title": "a", "post_hint": "link", "url_overridden_by_dest": "https://x.io"}),
            json!({"title": "b", "post_hint": "image", "url_overridden_by_dest": ""}),
        ];
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/r/cryptocurrency/hot.json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(listing(posts))
            .create_async()
            .await;

        let service = service(&server, RandomPicker::seeded(11));
        for _ in 0..5 {
            let meme = service.meme(&ContentTags::default()).await;
            assert!(SERIOUS_TITLES.contains(&meme.title.as_str()));
            assert_eq!(meme.url, "");
        }
    }

    #[tokio::test]
    async fn test_provider_failure_uses_fun_pool() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/r/cryptomemes/hot.json")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let meme = service(&server, FixedPicker(1)).meme(&fun()).await;

        assert_eq!(
            meme,
            MemeResponse {
                title: "To the moon!".into(),
                url: String::new()
            }
        );
    }

    #[test]
    fn test_subreddit_follows_fun_tag() {
        assert_eq!(subreddit_for(&fun()), "cryptomemes");
        assert_eq!(subreddit_for(&ContentTags::default()), "cryptocurrency");
    }
}
