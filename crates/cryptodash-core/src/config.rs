//! 설정 관리.
//!
//! 애플리케이션 설정은 시작 시점에 한 번 로드되어 각 컴포넌트의
//! 생성자로 명시적으로 전달됩니다. 요청 처리 중에 환경 변수를 다시
//! 읽지 않습니다.
//!
//! 로드 순서 (뒤가 우선):
//! 1. 코드 기본값
//! 2. TOML 파일 (선택, 기본 경로 `config/default.toml`)
//! 3. `CRYPTODASH__` 접두사 환경 변수 (예: `CRYPTODASH__SERVER__PORT=8080`)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 블록리스트 기본값. 과거 잘못 수집된 뉴스에 남아 있던 링크입니다.
pub const DEFAULT_BLOCKED_URLS: &[&str] = &["https://www.coindesk.com/bitcoin"];

/// 개발용 JWT 시크릿. 운영 환경에서는 반드시 교체해야 합니다.
pub const DEVELOPMENT_JWT_SECRET: &str = "development-secret-key-change-in-production-32";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// JWT 설정
    #[serde(default)]
    pub jwt: JwtConfig,
    /// 외부 데이터 제공자 설정
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// 콘텐츠 캐시 정책
    #[serde(default)]
    pub content: ContentConfig,
    /// CORS 설정
    #[serde(default)]
    pub cors: CorsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 전역 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite 연결 URL
    pub url: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://cryptodash.db".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨 필터
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "cryptodash_api=info,cryptodash_data=info,tower_http=info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// JWT 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// HS256 서명 키
    pub secret: String,
    /// 발급자 (iss)
    pub issuer: String,
    /// 대상 (aud)
    pub audience: String,
    /// 토큰 유효 기간 (일)
    pub expires_in_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEVELOPMENT_JWT_SECRET.to_string(),
            issuer: "cryptodash".to_string(),
            audience: "cryptodash".to_string(),
            expires_in_days: 7,
        }
    }
}

impl JwtConfig {
    /// 개발용 기본 시크릿을 그대로 쓰고 있는지 여부.
    pub fn uses_development_secret(&self) -> bool {
        self.secret == DEVELOPMENT_JWT_SECRET
    }
}

/// 외부 데이터 제공자 설정.
///
/// 모든 URL은 설정 값이므로 테스트에서는 로컬 mock 서버를 가리킬 수 있습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// 뉴스 API 엔드포인트 (CryptoPanic posts)
    pub news_url: String,
    /// 뉴스 API 토큰 (익명 접근 시 "demo")
    pub news_auth_token: String,
    /// 시세 API 엔드포인트 (CoinGecko simple/price)
    pub prices_url: String,
    /// LLM chat completion 엔드포인트 (OpenRouter)
    pub llm_url: String,
    /// LLM API 키. 없으면 인사이트는 항상 대체 문구를 사용합니다.
    pub llm_api_key: Option<String>,
    /// LLM 모델 이름
    pub llm_model: String,
    /// LLM 응답 토큰 한도
    pub llm_max_tokens: u32,
    /// OpenRouter `HTTP-Referer` 헤더 값
    pub llm_referer: String,
    /// OpenRouter `X-Title` 헤더 값
    pub llm_title: String,
    /// 밈 리스팅 기본 URL (Reddit)
    pub meme_base_url: String,
    /// 밈 리스팅 요청에 사용할 User-Agent
    pub meme_user_agent: String,
    /// 뉴스/밈 요청 타임아웃 (초)
    pub fetch_timeout_secs: u64,
    /// 그 외 요청의 기본 타임아웃 (초)
    pub default_timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            news_url: "https://cryptopanic.com/api/v1/posts/".to_string(),
            news_auth_token: "demo".to_string(),
            prices_url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            llm_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            llm_api_key: None,
            llm_model: "openai/gpt-3.5-turbo".to_string(),
            llm_max_tokens: 150,
            llm_referer: "http://localhost:5000".to_string(),
            llm_title: "CryptoDash Advisor".to_string(),
            meme_base_url: "https://www.reddit.com".to_string(),
            meme_user_agent: "CryptoDashboard/1.0".to_string(),
            fetch_timeout_secs: 10,
            default_timeout_secs: 30,
        }
    }
}

impl ProvidersConfig {
    /// 뉴스/밈 요청 타임아웃.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// 기본 요청 타임아웃.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    /// 비어 있지 않은 LLM API 키.
    pub fn llm_api_key(&self) -> Option<&str> {
        self.llm_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// 콘텐츠 캐시 정책.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// 캐시된 뉴스에 포함되어 있으면 당일 캐시를 무효화하는 링크 목록
    pub blocked_urls: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            blocked_urls: DEFAULT_BLOCKED_URLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// CORS 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 허용 origin 목록. 비어 있으면 모든 origin을 허용합니다 (개발 모드).
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 건너뜁니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ::config::ConfigError> {
        let builder = ::config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix("CRYPTODASH")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("content.blocked_urls")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, ::config::ConfigError> {
        Self::load("config/default.toml")
    }
}
