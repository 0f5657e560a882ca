//! 캐시된 뉴스 페이로드 검증.
//!
//! 페이로드의 `results` 배열을 훑어 다음을 판단합니다:
//! - 블록리스트에 오른 링크가 하나라도 있으면 stale
//! - http(s) 링크가 하나도 없으면 stale
//! - JSON이 아니거나 `results` 배열이 없거나 항목 구조가 깨졌으면 corrupt
//!
//! `url`이 없거나 `null`인 항목은 건너뜁니다.

use serde_json::Value;
use std::collections::HashSet;

/// 캐시가 stale로 판정된 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// 블록리스트 링크 포함
    BlockedUrl,
    /// http(s) 링크 없음
    NoValidUrl,
}

/// 검증 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale(StaleReason),
    Corrupt(String),
}

impl Freshness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Freshness::Fresh)
    }

    /// 메트릭 라벨.
    pub fn reason_label(&self) -> &'static str {
        match self {
            Freshness::Fresh => "fresh",
            Freshness::Stale(StaleReason::BlockedUrl) => "blocked_url",
            Freshness::Stale(StaleReason::NoValidUrl) => "no_valid_url",
            Freshness::Corrupt(_) => "corrupt",
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// 뉴스 페이로드 검증기.
#[derive(Debug, Clone, Default)]
pub struct FreshnessValidator {
    blocked_urls: HashSet<String>,
}

impl FreshnessValidator {
    pub fn new<I, S>(blocked_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocked_urls: blocked_urls
                .into_iter()
                .map(Into::into)
                .filter(|url: &String| !url.trim().is_empty())
                .collect(),
        }
    }

    pub fn is_blocked(&self, url: &str) -> bool {
        self.blocked_urls.contains(url)
    }

    pub fn inspect(&self, payload: &str) -> Freshness {
        let root: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(e) => return Freshness::Corrupt(format!("invalid JSON: {}", e)),
        };

        let Some(results) = root.get("results").and_then(Value::as_array) else {
            return Freshness::Corrupt("missing results array".to_string());
        };

        let mut has_valid_url = false;
        for (index, item) in results.iter().enumerate() {
            let Some(item) = item.as_object() else {
                return Freshness::Corrupt(format!("results[{}] is not an object", index));
            };

            let url = match item.get("url") {
                None | Some(Value::Null) => continue,
                Some(Value::String(url)) => url,
                Some(_) => {
                    return Freshness::Corrupt(format!("results[{}].url is not a string", index))
                }
            };

            if self.is_blocked(url) {
                return Freshness::Stale(StaleReason::BlockedUrl);
            }
            if is_http_url(url) {
                has_valid_url = true;
            }
        }

        if has_valid_url {
            Freshness::Fresh
        } else {
            Freshness::Stale(StaleReason::NoValidUrl)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTINEL: &str = "https://www.coindesk.com/bitcoin";

    fn validator() -> FreshnessValidator {
        FreshnessValidator::new([SENTINEL])
    }

    #[test]
    fn test_http_urls_are_fresh() {
        let payload = r#"{"results":[
            {"title":"a","url":"https://cryptopanic.com/news/1","published_at":"x"},
            {"title":"b","url":"http://example.com/2"}
        ]}"#;
        assert_eq!(validator().inspect(payload), Freshness::Fresh);
    }

    #[test]
    fn test_blocked_url_anywhere_is_stale() {
        let payload = format!(
            r#"{{"results":[{{"url":"https://ok.io"}},{{"url":"{}"}}]}}"#,
            SENTINEL
        );
        assert_eq!(
            validator().inspect(&payload),
            Freshness::Stale(StaleReason::BlockedUrl)
        );
    }

    #[test]
    fn test_blocklist_is_exact_match() {
        let payload = r#"{"results":[{"url":"https://www.coindesk.com/bitcoin/"}]}"#;
        assert!(validator().inspect(payload).is_fresh());
    }

    #[test]
    fn test_no_http_urls_is_stale() {
        for payload in [
            r#"{"results":[]}"#,
            r#"{"results":[{"title":"no link"}]}"#,
            r#"{"results":[{"url":null},{"url":"/relative/path"},{"url":"ftp://x"}]}"#,
        ] {
            assert_eq!(
                validator().inspect(payload),
                Freshness::Stale(StaleReason::NoValidUrl),
                "{payload}"
            );
        }
    }

    #[test]
    fn test_structural_failures_are_corrupt() {
        for payload in [
            "not json",
            r#"{"data":[]}"#,
            r#"{"results":{"url":"https://x.io"}}"#,
            r#"{"results":["https://x.io"]}"#,
            r#"{"results":[{"url":42}]}"#,
        ] {
            assert!(
                matches!(validator().inspect(payload), Freshness::Corrupt(_)),
                "{payload}"
            );
        }
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(Freshness::Fresh.reason_label(), "fresh");
        assert_eq!(
            Freshness::Stale(StaleReason::BlockedUrl).reason_label(),
            "blocked_url"
        );
        assert_eq!(Freshness::Corrupt(String::new()).reason_label(), "corrupt");
    }

    #[test]
    fn test_empty_blocklist_entries_are_ignored() {
        let validator = FreshnessValidator::new(["", "  "]);
        assert!(!validator.is_blocked(""));
    }
}
