//! 외부 시장 데이터 제공자.
//!
//! 각 제공자는 트레이트 뒤에 숨겨져 있어 서비스 계층에서 테스트용 구현으로
//! 교체할 수 있습니다. 기본 URL은 모두 설정 값입니다.
//!
//! | 제공자 | 트레이트 | 구현 |
//! |---|---|---|
//! | 뉴스 | [`NewsSource`] | [`CryptoPanicClient`] |
//! | 시세 | [`PriceSource`] | [`CoinGeckoClient`] |
//! | LLM | [`ChatCompletion`] | [`OpenRouterClient`] |
//! | 밈 | [`MemeSource`] | [`RedditClient`] |

pub mod llm;
pub mod news;
pub mod prices;
pub mod reddit;

pub use llm::{ChatCompletion, OpenRouterClient};
pub use news::{CryptoPanicClient, NewsSource};
pub use prices::{CoinGeckoClient, CoinQuote, PriceSource};
pub use reddit::{ListingPost, MemeSource, RedditClient};

use crate::error::Result;
use std::time::Duration;

/// 모든 제공자 요청에 붙는 기본 User-Agent.
pub const DEFAULT_USER_AGENT: &str = "CryptoDashboard/1.0";

/// 공통 HTTP 클라이언트를 생성합니다.
pub(crate) fn http_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// 응답 상태를 확인하고 2xx가 아니면 오류로 변환합니다.
pub(crate) fn ensure_success(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(crate::error::DataError::UpstreamStatus {
            provider,
            status: status.as_u16(),
        })
    }
}
