//! 라우터 전체를 통한 사용자 흐름 테스트.
//!
//! 외부 제공자는 mockito 서버 또는 닫힌 포트로 대체합니다.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use cryptodash_api::routes::create_api_router;
use cryptodash_api::services::insight::LIGHTHEARTED_INSIGHTS;
use cryptodash_api::services::RandomPicker;
use cryptodash_api::state::AppState;
use cryptodash_core::AppConfig;
use cryptodash_data::Database;
use mockito::Matcher;
use serde_json::{json, Value};
use tower::ServiceExt;

const CLOSED: &str = "http://127.0.0.1:9";

fn offline_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.providers.news_url = format!("{}/api/v1/posts/", CLOSED);
    config.providers.prices_url = format!("{}/api/v3/simple/price", CLOSED);
    config.providers.llm_api_key = None;
    config.providers.meme_base_url = CLOSED.to_string();
    config.providers.fetch_timeout_secs = 2;
    config.providers.default_timeout_secs = 2;
    config
}

async fn app(config: &AppConfig) -> Router {
    let db = Database::connect_in_memory().await.unwrap();
    let state = AppState::with_picker(config, db, Arc::new(RandomPicker::seeded(1))).unwrap();
    create_api_router().with_state(Arc::new(state))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": email, "name": "Ada", "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_login_and_personalized_insight() {
    let app = app(&offline_config()).await;
    register(&app, "ada@example.com").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        "POST",
        "/api/onboarding",
        Some(&token),
        Some(json!({
            "interestedAssets": "[\"Bitcoin\"]",
            "investorType": "HODLer",
            "contentTypes": "[\"Fun\"]"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Preferences saved successfully");

    let (status, body) = call(&app, "GET", "/api/dashboard/ai-insight", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let insight = body["insight"].as_str().unwrap();
    assert!(LIGHTHEARTED_INSIGHTS.contains(&insight), "{insight}");

    let (status, body) = call(&app, "GET", "/api/dashboard/prices", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"bitcoin": {"usd": 45000.0}}));
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_token() {
    let app = app(&offline_config()).await;

    let (status, body) = call(&app, "GET", "/api/dashboard/news", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "MISSING_TOKEN");

    let (status, _) = call(&app, "GET", "/api/vote", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = app(&offline_config()).await;
    register(&app, "bob@example.com").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"email": "BOB@example.com", "name": "Bob", "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with this email already exists");
}

#[tokio::test]
async fn news_is_fetched_once_per_day() {
    let mut server = mockito::Server::new_async().await;
    let live = r#"{"results":[{"title":"ETF inflows","url":"https://cryptopanic.com/news/42","published_at":"2026-03-01T08:00:00Z"}]}"#;
    let mock = server
        .mock("GET", "/api/v1/posts/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("auth_token".into(), "demo".into()),
            Matcher::UrlEncoded("public".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(live)
        .expect(1)
        .create_async()
        .await;

    let mut config = offline_config();
    config.providers.news_url = format!("{}/api/v1/posts/", server.url());
    let app = app(&config).await;
    let token = register(&app, "cy@example.com").await;

    let expected: Value = serde_json::from_str(live).unwrap();
    for _ in 0..3 {
        let (status, body) = call(&app, "GET", "/api/dashboard/news", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, expected);
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn votes_round_trip_through_router() {
    let app = app(&offline_config()).await;
    let token = register(&app, "dee@example.com").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/vote",
        Some(&token),
        Some(json!({"sectionType": "Meme", "isPositive": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vote saved successfully");

    let (_, body) = call(&app, "GET", "/api/vote", Some(&token), None).await;
    assert_eq!(body, json!([{"sectionType": "Meme", "isPositive": true}]));
}
