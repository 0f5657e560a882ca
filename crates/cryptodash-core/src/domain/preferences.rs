//! 사용자 선호 태그와 톤 결정.
//!
//! 온보딩에서 저장된 선호는 JSON 배열 문자열로 보관됩니다
//! (예: `["Bitcoin","Solana"]`, `["Charts","Fun"]`). 이 모듈은 그 문자열을
//! 해석해 인사이트 톤과 밈 서브레딧을 결정하는 데 필요한 타입을 제공합니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 차트 선호 태그. 있으면 기술적 분석 톤.
pub const TAG_CHARTS: &str = "Charts";
/// 재미 선호 태그. 있으면 가벼운 톤과 밈 서브레딧.
pub const TAG_FUN: &str = "Fun";

/// JSON 배열 문자열을 문자열 목록으로 해석합니다.
///
/// 배열이 아니거나 문자열이 아닌 원소가 있으면 `None`.
pub fn parse_string_list(raw: &str) -> Option<Vec<String>> {
    serde_json::from_str::<Vec<String>>(raw).ok()
}

/// 사용자가 선택한 콘텐츠 태그 집합.
///
/// 비교는 대소문자를 구분하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTags {
    tags: BTreeSet<String>,
}

impl ContentTags {
    /// 저장된 `contentTypes` 값에서 태그 집합을 만듭니다.
    ///
    /// 값이 없거나 해석할 수 없으면 빈 집합을 반환합니다.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(parse_string_list)
            .map(Self::from_iter)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(&tag.trim().to_lowercase())
    }

    pub fn prefers_charts(&self) -> bool {
        self.contains(TAG_CHARTS)
    }

    pub fn prefers_fun(&self) -> bool {
        self.contains(TAG_FUN)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ContentTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tags: iter
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

/// 인사이트 톤.
///
/// 우선순위: Charts > Fun > 중립.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Technical,
    Lighthearted,
    Neutral,
}

impl Tone {
    pub fn from_tags(tags: &ContentTags) -> Self {
        if tags.prefers_charts() {
            Tone::Technical
        } else if tags.prefers_fun() {
            Tone::Lighthearted
        } else {
            Tone::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Technical => "technical",
            Tone::Lighthearted => "lighthearted",
            Tone::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
