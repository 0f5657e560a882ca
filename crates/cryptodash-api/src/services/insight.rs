//! AI 인사이트 생성.
//!
//! 콘텐츠 태그에서 톤을 정하고, 톤별 프롬프트로 LLM을 호출합니다.
//! API 키가 없거나 호출이 실패하면 톤별 고정 문구 중 하나를 고릅니다.

use cryptodash_core::{ContentTags, Tone};
use cryptodash_data::ChatCompletion;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use utoipa::ToSchema;

use super::fallback::{pick, FallbackPicker};
use crate::metrics;

const TECHNICAL_PROMPT: &str = "Give a brief technical and financial analysis (2-3 sentences) about current crypto market trends, focusing on price movements, technical indicators, and trading opportunities for Bitcoin and Ethereum.";

const LIGHTHEARTED_PROMPT: &str = "Give a fun and lighthearted crypto market insight (2-3 sentences) with a humorous tone about current trends. Make it entertaining while mentioning Bitcoin, Ethereum, and general market sentiment.";

const NEUTRAL_PROMPT: &str = "Give a brief daily crypto market insight (2-3 sentences) about current trends, focusing on Bitcoin, Ethereum, and general market sentiment.";

pub const TECHNICAL_INSIGHTS: [&str; 3] = [
    "Technical analysis shows Bitcoin testing key resistance levels around $45,000. Ethereum's RSI indicates potential bullish momentum. Watch for breakout patterns and volume confirmation.",
    "Market structure suggests consolidation phase. Bitcoin's support at $42,000 remains strong while Ethereum shows relative strength. Consider range trading strategies.",
    "Price action indicates potential trend reversal. Bitcoin's moving averages are converging, suggesting volatility ahead. Ethereum's chart shows bullish divergence.",
];

pub const LIGHTHEARTED_INSIGHTS: [&str; 3] = [
    "Bitcoin is mooning again! 🚀 Ethereum is doing its thing, and the crypto market is basically a rollercoaster that never stops. HODL strong, my friends!",
    "The crypto market is wilder than a rodeo! Bitcoin's doing its best impression of a rocket ship, and Ethereum is just chilling like a boss. Buckle up!",
    "Crypto markets are more unpredictable than the weather! Bitcoin's up, Ethereum's vibing, and we're all just here for the ride. To the moon! 🌙",
];

pub const NEUTRAL_INSIGHTS: [&str; 3] = [
    "The crypto market is showing strong momentum. Bitcoin and Ethereum continue to lead, with growing institutional adoption. Consider diversifying your portfolio and staying updated with market trends.",
    "Market volatility remains a key factor in crypto investing. Bitcoin's dominance continues while altcoins show mixed signals. Stay informed and invest responsibly.",
    "Crypto markets are experiencing increased activity. Ethereum's ecosystem growth and Bitcoin's store-of-value narrative remain strong. Keep an eye on regulatory developments.",
];

/// 톤별 LLM 프롬프트.
pub fn prompt_for(tone: Tone) -> &'static str {
    match tone {
        Tone::Technical => TECHNICAL_PROMPT,
        Tone::Lighthearted => LIGHTHEARTED_PROMPT,
        Tone::Neutral => NEUTRAL_PROMPT,
    }
}

/// 톤별 고정 문구 풀.
pub fn fallback_pool(tone: Tone) -> &'static [&'static str] {
    match tone {
        Tone::Technical => &TECHNICAL_INSIGHTS,
        Tone::Lighthearted => &LIGHTHEARTED_INSIGHTS,
        Tone::Neutral => &NEUTRAL_INSIGHTS,
    }
}

/// 인사이트 응답
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InsightResponse {
    pub insight: String,
}

pub struct InsightService {
    llm: Option<Arc<dyn ChatCompletion>>,
    picker: Arc<dyn FallbackPicker>,
}

impl InsightService {
    /// `llm`이 `None`이면 항상 고정 문구를 사용합니다.
    pub fn new(llm: Option<Arc<dyn ChatCompletion>>, picker: Arc<dyn FallbackPicker>) -> Self {
        Self { llm, picker }
    }

    pub async fn insight(&self, tags: &ContentTags) -> InsightResponse {
        let tone = Tone::from_tags(tags);

        if let Some(llm) = &self.llm {
            let started = Instant::now();
            let result = llm.complete(prompt_for(tone)).await;
            metrics::record_provider_duration("llm", started.elapsed().as_secs_f64());

            match result {
                Ok(insight) => return InsightResponse { insight },
                Err(e) => warn!(tone = %tone, error = %e, "LLM 호출 실패, 고정 문구 사용"),
            }
        } else {
            debug!(tone = %tone, "LLM 키 없음, 고정 문구 사용");
        }

        metrics::record_fallback("ai_insight");
        let insight = pick(self.picker.as_ref(), fallback_pool(tone))
            .copied()
            .unwrap_or(NEUTRAL_INSIGHTS[0]);
        InsightResponse {
            insight: insight.to_string(),
        }
    }
}
