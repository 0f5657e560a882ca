//! 일일 콘텐츠 캐시 키.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 캐시되는 콘텐츠 유형.
///
/// 현재는 뉴스만 날짜 단위로 캐시합니다. 시세, 인사이트, 밈은
/// 매 요청마다 새로 계산됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    News,
}

impl ContentType {
    /// 저장소에 기록되는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::News => "news",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "news" => Ok(ContentType::News),
            other => Err(CoreError::InvalidInput(format!(
                "Unknown content type: {}",
                other
            ))),
        }
    }
}

/// 캐시 키: (콘텐츠 유형, UTC 날짜).
///
/// 날짜가 바뀌면 이전 키와 절대 일치하지 않으므로 전날 행은 자연스럽게
/// 읽히지 않게 됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub content_type: ContentType,
    pub date: NaiveDate,
}

impl CacheKey {
    pub fn new(content_type: ContentType, date: NaiveDate) -> Self {
        Self { content_type, date }
    }

    /// 해당 날짜의 뉴스 키.
    pub fn news(date: NaiveDate) -> Self {
        Self::new(ContentType::News, date)
    }

    /// 주어진 시각이 속한 UTC 날짜의 뉴스 키.
    pub fn news_at(now: DateTime<Utc>) -> Self {
        Self::news(now.date_naive())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.content_type, self.date)
    }
}
