//! CryptoDash API 서버.
//!
//! 설정을 로드하고 DB를 준비한 뒤 Axum 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{extract::State, http::StatusCode, middleware, routing::get, Router};
use chrono::Utc;
use cryptodash_api::metrics::setup_metrics_recorder;
use cryptodash_api::middleware::metrics_layer;
use cryptodash_api::openapi::swagger_ui_router;
use cryptodash_api::routes::create_api_router;
use cryptodash_api::state::AppState;
use cryptodash_core::{init_logging, AppConfig, CorsConfig, LogConfig};
use cryptodash_data::{ContentCacheStore, Database, SqliteContentCache};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("설정 로드 실패")?;

    init_logging(LogConfig::from(&config.logging)).context("로깅 초기화 실패")?;
    info!("Starting CryptoDash API server...");

    let metrics_handle = setup_metrics_recorder().context("메트릭 레코더 설치 실패")?;
    info!("Prometheus metrics recorder initialized");

    if config.jwt.uses_development_secret() {
        warn!("JWT secret not set, using development default (INSECURE for development only)");
    }

    // 데이터베이스 연결 및 마이그레이션
    let db = Database::connect(&config.database)
        .await
        .context("데이터베이스 연결 실패")?;
    db.migrate().await.context("마이그레이션 실패")?;
    info!(url = %config.database.url, "Database ready");

    // 지난 날짜의 캐시 정리
    let today = Utc::now().date_naive();
    match SqliteContentCache::new(db.pool().clone())
        .purge_before(today)
        .await
    {
        Ok(0) => {}
        Ok(purged) => info!(purged, "지난 날짜 콘텐츠 캐시 정리"),
        Err(e) => warn!(error = %e, "콘텐츠 캐시 정리 실패"),
    }

    let state = Arc::new(AppState::new(&config, db).context("상태 초기화 실패")?);
    info!(version = %state.version, "Application state initialized");

    let app = create_router(state, metrics_handle, &config);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("{} 바인딩 실패", addr))?;

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// 전체 라우터 조합.
fn create_router(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    config: &AppConfig,
) -> Router {
    // 메트릭 라우터 (별도 상태)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router())
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_secs),
        ))
        .layer(cors_layer(&config.cors))
}

async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .allowed_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        if !config.allowed_origins.is_empty() {
            warn!("cors.allowed_origins contains no valid origins, allowing any");
        } else {
            warn!("cors.allowed_origins not set, allowing any origin (development mode)");
        }
        AllowOrigin::any()
    } else {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
}

/// Ctrl+C 또는 SIGTERM 대기.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
