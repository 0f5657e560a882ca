//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭과 대시보드 캐시/대체 경로 메트릭을 수집하고
//! `/metrics` 엔드포인트로 노출합니다.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설치하고 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

// ============================================================================
// HTTP 메트릭
// ============================================================================

pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

// ============================================================================
// 대시보드 메트릭
// ============================================================================

/// 당일 캐시를 그대로 반환한 횟수.
pub fn record_cache_hit(content_type: &str) {
    counter!("dashboard_cache_hits_total", "content_type" => content_type.to_string())
        .increment(1);
}

/// 캐시 무효화 횟수 (reason: blocked_url, no_valid_url, corrupt).
pub fn record_cache_invalidation(content_type: &str, reason: &str) {
    counter!(
        "dashboard_cache_invalidations_total",
        "content_type" => content_type.to_string(),
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// 외부 제공자 대신 대체 값을 반환한 횟수.
pub fn record_fallback(section: &str) {
    counter!("dashboard_fallback_total", "section" => section.to_string()).increment(1);
}

/// 외부 제공자 호출 시간.
pub fn record_provider_duration(provider: &str, duration_secs: f64) {
    histogram!("provider_request_duration_seconds", "provider" => provider.to_string())
        .record(duration_secs);
}

/// 인증 거부 횟수.
pub fn record_auth_rejection(reason: &str) {
    counter!("auth_rejections_total", "reason" => reason.to_string()).increment(1);
}

// ============================================================================
// 경로 정규화
// ============================================================================

/// 경로의 숫자 세그먼트를 `:id`로 바꿉니다.
///
/// 예: `/api/users/123` → `/api/users/:id`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(normalize_path("/api/users/12345"), "/api/users/:id");
    }

    #[test]
    fn test_normalize_path_static() {
        assert_eq!(
            normalize_path("/api/dashboard/ai-insight"),
            "/api/dashboard/ai-insight"
        );
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_recorders_without_installed_recorder_are_noops() {
        record_cache_hit("news");
        record_cache_invalidation("news", "corrupt");
        record_fallback("meme");
        record_provider_duration("coingecko", 0.12);
    }
}
